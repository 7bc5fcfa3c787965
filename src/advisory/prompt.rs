//! Prompt rendering for the advisory service.
//!
//! Pure functions from a prediction and structured request parameters to
//! prompt text, testable without calling the service.

/// Output language requested by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    English,
    Tamil,
}

impl Language {
    /// Map a request language code; anything other than "ta" is English.
    pub fn from_code(code: Option<&str>) -> Self {
        match code {
            Some("ta") => Language::Tamil,
            _ => Language::English,
        }
    }
}

/// Parameters for the crop advisory prompt.
#[derive(Debug, Clone)]
pub struct CropPromptParams<'a> {
    pub crop: &'a str,
    pub n: f64,
    pub p: f64,
    pub k: f64,
    pub temperature: f64,
    pub humidity: f64,
    pub ph: f64,
    pub rainfall: f64,
    pub location: &'a str,
    pub area: f64,
    pub language: Language,
}

/// Render the crop advisory prompt: duration, water requirement for the
/// given acreage, and a fertilizer recommendation, without markdown
/// emphasis markers.
pub fn crop_prompt(params: &CropPromptParams<'_>) -> String {
    let language = match params.language {
        Language::Tamil => "Tamil",
        Language::English => "English",
    };

    format!(
        "Given the soil conditions (N={n}, P={p}, K={k}), temperature={temperature}, \
         humidity={humidity}, pH={ph}, and rainfall={rainfall} for {location} with {area} \
         acres of land, provide a short response in {language} with points covering:\n\
         - Crop Duration for {crop}\n\
         - Water Required (in liters per crop and total for input acres)\n\
         - Recommended Fertilizer (with name)\n\
         Do not use ## or *** in the response.",
        n = params.n,
        p = params.p,
        k = params.k,
        temperature = params.temperature,
        humidity = params.humidity,
        ph = params.ph,
        rainfall = params.rainfall,
        location = params.location,
        area = params.area,
        crop = params.crop,
    )
}

/// Render the disease advisory prompt: top 3 pesticides, the best one with
/// usage guidance, and prevention tips. The Tamil variant also asks for
/// localized pesticide names.
pub fn disease_prompt(disease: &str, language: Language) -> String {
    let language = match language {
        Language::Tamil => "Tamil even the pesticides names",
        Language::English => "English",
    };

    format!(
        "Provide a short summary in {language} for {disease} including:\n\
         - Top 3 Pesticides (List only the 3 best)\n\
         - Best Pesticide (Explain its application and use case)\n\
         - Prevention Tips\n\
         Do not use ## or *** in the response. Format pesticides as 1), 2), 3)."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_params(language: Language) -> CropPromptParams<'static> {
        CropPromptParams {
            crop: "rice",
            n: 90.0,
            p: 42.0,
            k: 43.0,
            temperature: 20.8,
            humidity: 82.0,
            ph: 6.5,
            rainfall: 202.9,
            location: "Madurai",
            area: 2.5,
            language,
        }
    }

    #[test]
    fn test_language_from_code() {
        assert_eq!(Language::from_code(Some("ta")), Language::Tamil);
        assert_eq!(Language::from_code(Some("en")), Language::English);
        assert_eq!(Language::from_code(Some("fr")), Language::English);
        assert_eq!(Language::from_code(None), Language::English);
    }

    #[test]
    fn test_crop_prompt_embeds_parameters() {
        let prompt = crop_prompt(&sample_params(Language::English));
        assert!(prompt.contains("N=90"));
        assert!(prompt.contains("pH=6.5"));
        assert!(prompt.contains("Madurai"));
        assert!(prompt.contains("2.5 acres"));
        assert!(prompt.contains("Crop Duration for rice"));
        assert!(prompt.contains("in English"));
    }

    #[test]
    fn test_crop_prompt_tamil() {
        let prompt = crop_prompt(&sample_params(Language::Tamil));
        assert!(prompt.contains("in Tamil"));
        assert!(!prompt.contains("in English"));
    }

    #[test]
    fn test_disease_prompt_english() {
        let prompt = disease_prompt("Rice Blast", Language::English);
        assert!(prompt.contains("for Rice Blast"));
        assert!(prompt.contains("Top 3 Pesticides"));
        assert!(prompt.contains("in English"));
        assert!(prompt.contains("1), 2), 3)"));
    }

    #[test]
    fn test_disease_prompt_tamil_localizes_pesticide_names() {
        let prompt = disease_prompt("Tungro", Language::Tamil);
        assert!(prompt.contains("Tamil even the pesticides names"));
    }
}

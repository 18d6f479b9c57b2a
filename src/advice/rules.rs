/// Predictions below this confidence get the retake caveat appended.
pub const LOW_CONFIDENCE_THRESHOLD: f32 = 0.7;

pub const LOW_CONFIDENCE_CAVEAT: &str =
    "Note: Low confidence prediction - consider retaking photo with better lighting and closer view.";

pub const DEFAULT_RECOMMENDATION: &str =
    "Unknown condition detected. Consult a veterinarian for proper diagnosis.";

/// Lower-case labels that mean no disease was found.
pub const HEALTHY_LABELS: [&str; 3] = ["healthy", "normal", "no_disease"];

const RECOMMENDATIONS: [(&str, &str); 5] = [
    ("healthy", "The chicken appears healthy. Continue regular monitoring."),
    (
        "coccidiosis",
        "Possible coccidiosis detected. Consider consulting a veterinarian and check water quality.",
    ),
    (
        "salmonella",
        "Potential salmonella infection. Isolate the bird and consult a veterinarian immediately.",
    ),
    (
        "e_coli",
        "Possible E.coli infection. Improve hygiene and consult a veterinarian.",
    ),
    (
        "newcastle",
        "Potential Newcastle disease. This is serious - contact veterinarian immediately and isolate birds.",
    ),
];

/// Advisory text for `label`, matched case-insensitively, with the
/// low-confidence caveat appended when `confidence` is under the threshold.
pub fn recommend(label: &str, confidence: f32) -> String {
    let base = RECOMMENDATIONS
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(label))
        .map(|(_, text)| *text)
        .unwrap_or(DEFAULT_RECOMMENDATION);

    if confidence < LOW_CONFIDENCE_THRESHOLD {
        format!("{} {}", base, LOW_CONFIDENCE_CAVEAT)
    } else {
        base.to_owned()
    }
}

/// Whether `label` denotes a healthy bird. Confidence plays no part.
pub fn is_healthy(label: &str) -> bool {
    let lower = label.to_lowercase();
    HEALTHY_LABELS.contains(&lower.as_str())
}

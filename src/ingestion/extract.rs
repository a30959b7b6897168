//! Pattern extraction over a normalized label corpus.
//!
//! Each rule (allergy, interaction, pregnancy) is an independent pure
//! function of its inputs: deterministic, never failing, degrading to an
//! empty contribution when nothing matches. The corpus is expected to be
//! lowercase (see `DrugLabel::corpus`).

use std::sync::LazyLock;

use regex::Regex;

/// Allergy indicator lexicon: reaction terms and drug-class names whose
/// literal presence in a warning marks a trigger.
const ALLERGY_INDICATORS: &[&str] = &[
    "allergy alert",
    "hives",
    "swelling",
    "facial swelling",
    "asthma",
    "wheezing",
    "shock",
    "rash",
    "penicillin",
    "sulfa",
    "sulfonamide",
    "cephalosporin",
    "latex",
    "nsaid",
    "aspirin",
];

/// Common-drug vocabulary for interaction mining.
const COMMON_DRUGS: &[&str] = &[
    "ibuprofen",
    "acetaminophen",
    "naproxen",
    "warfarin",
    "steroids",
    "aspirin",
    "paracetamol",
    "metformin",
    "atorvastatin",
    "amoxicillin",
    "pantoprazole",
    "levothyroxine",
    "amlodipine",
    "losartan",
    "omeprazole",
    "fexofenadine",
    "azithromycin",
    "cetirizine",
];

/// Generics whose vague "allergic reaction to this product" warnings also
/// imply the antihistamine class.
const ANTIHISTAMINE_GENERICS: &[&str] = &["cetirizine", "fexofenadine", "hydroxyzine"];

static ALLERGIC_TO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"allergic to ([a-z0-9 ,\-]+)").expect("Invalid allergy regex"));

static CONTAINING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"take other drugs containing ([a-z0-9 ,\-]+)").expect("Invalid containing regex")
});

static TAKING_RE: LazyLock<Regex> = LazyLock::new(|| {
    let alternation = COMMON_DRUGS.join("|");
    Regex::new(&format!(r"taking.*?({alternation})")).expect("Invalid taking regex")
});

static LIST_SPLIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",| or | and ").expect("Invalid list split regex"));

static PREGNANCY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"pregnan(?:t|cy)[^.]*\.").expect("Invalid pregnancy regex"));

/// Derive allergy triggers from the corpus.
///
/// Three rules contribute, in order: literal indicator scan, the
/// "allergic to <X>" capture pattern, and vague-warning inference (a label
/// that warns about reactions "to this product" without naming an ingredient
/// implicates the drug's own generic name).
pub fn extract_allergy_triggers(corpus: &str, generic_name: &str) -> Vec<String> {
    let mut triggers: Vec<String> = Vec::new();

    for indicator in ALLERGY_INDICATORS {
        if corpus.contains(indicator) {
            triggers.push(indicator.to_string());
        }
    }

    for captures in ALLERGIC_TO_RE.captures_iter(corpus) {
        if let Some(listed) = captures.get(1) {
            triggers.extend(split_listed_terms(listed.as_str()));
        }
    }

    if corpus.contains("allergic reaction to this product")
        || corpus.contains("allergic reaction to any of its ingredients")
    {
        triggers.push(generic_name.to_string());
        if ANTIHISTAMINE_GENERICS.contains(&generic_name) {
            triggers.push("antihistamine".to_string());
        }
    }

    dedup_nonempty(triggers)
}

/// Derive interaction partners from the corpus plus any explicit interaction
/// statements the label carries (included verbatim).
pub fn extract_interactions(corpus: &str, label_statements: &[String]) -> Vec<String> {
    let mut interactions: Vec<String> = Vec::new();

    for captures in CONTAINING_RE.captures_iter(corpus) {
        if let Some(listed) = captures.get(1) {
            interactions.extend(split_listed_terms(listed.as_str()));
        }
    }

    for captures in TAKING_RE.captures_iter(corpus) {
        if let Some(drug) = captures.get(1) {
            interactions.push(drug.as_str().to_string());
        }
    }

    // Literal occurrence scan, independent of the patterns above
    for drug in COMMON_DRUGS {
        if corpus.contains(drug) {
            interactions.push(drug.to_string());
        }
    }

    interactions.extend(label_statements.iter().cloned());

    if corpus.contains("sedatives") || corpus.contains("tranquilizers") {
        interactions.push("sedatives".to_string());
        interactions.push("tranquilizers".to_string());
    }

    dedup_nonempty(interactions)
}

/// Collect every pregnancy-related sentence (a "pregnan…" token through its
/// terminating period), space-joined. Empty string when none match.
pub fn extract_pregnancy_risk(corpus: &str) -> String {
    let sentences: Vec<&str> = PREGNANCY_RE
        .find_iter(corpus)
        .map(|m| m.as_str())
        .collect();
    sentences.join(" ")
}

/// Split a captured "<a>, <b> or <c>" list into trimmed candidate terms.
fn split_listed_terms(listed: &str) -> Vec<String> {
    LIST_SPLIT_RE
        .split(listed)
        .map(|s| s.trim().to_string())
        .collect()
}

/// Deduplicate preserving first occurrence and drop empty entries.
pub fn dedup_nonempty(items: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    items
        .into_iter()
        .filter(|item| !item.is_empty() && seen.insert(item.clone()))
        .collect()
}

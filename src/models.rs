use serde::{Deserialize, Serialize};

/// Partner membership level. Ordering is the membership ladder, so
/// `Tier::Gold >= Tier::Silver` reads as "gold sees silver content".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Tier {
    Bronze,
    Silver,
    Gold,
    Platinum,
}

impl Tier {
    pub const ALL: [Tier; 4] = [Tier::Bronze, Tier::Silver, Tier::Gold, Tier::Platinum];

    /// Unknown strings fall back to the lowest tier.
    pub fn parse(s: &str) -> Tier {
        match s {
            "silver" => Tier::Silver,
            "gold" => Tier::Gold,
            "platinum" => Tier::Platinum,
            _ => Tier::Bronze,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Bronze => "bronze",
            Tier::Silver => "silver",
            Tier::Gold => "gold",
            Tier::Platinum => "platinum",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tier::Bronze => "Bronze",
            Tier::Silver => "Silver",
            Tier::Gold => "Gold",
            Tier::Platinum => "Platinum",
        }
    }

    /// Tier names visible to an org of this tier, for `min_tier = ANY($1)` filters.
    pub fn visible_tiers(&self) -> Vec<String> {
        Tier::ALL
            .iter()
            .filter(|t| **t <= *self)
            .map(|t| t.as_str().to_string())
            .collect()
    }
}

/// One answer of a quiz submission. Persisted verbatim inside the attempt's
/// JSONB `answers` blob.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmittedAnswer {
    pub question_id: i64,
    pub selected: i32,
}

pub type NewQuestions = Vec<NewQuestion>;

/// Quiz question as pasted into the lesson authoring form (JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewQuestion {
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_index: i32,
}

/// Parse and sanity-check the authoring-form question JSON.
pub fn parse_questions_json(input: &str) -> Result<NewQuestions, &'static str> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(Vec::new());
    }

    let questions: NewQuestions =
        serde_json::from_str(input).map_err(|_| "questions must be a JSON array")?;

    for q in &questions {
        if q.prompt.trim().is_empty() {
            return Err("every question needs a prompt");
        }
        if q.options.len() < 2 {
            return Err("every question needs at least two options");
        }
        if q.correct_index < 0 || q.correct_index as usize >= q.options.len() {
            return Err("correct_index must point at one of the options");
        }
    }

    Ok(questions)
}

/// Turn "name: value" lines from the MDF form into a JSON object. The blob
/// stays writer-shaped; values are kept as strings.
pub fn parse_roi_metrics(input: &str) -> serde_json::Value {
    let mut metrics = serde_json::Map::new();
    for line in input.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let (name, value) = line.split_once(':').unwrap_or((line, ""));
        metrics.insert(
            name.trim().to_string(),
            serde_json::Value::String(value.trim().to_string()),
        );
    }
    serde_json::Value::Object(metrics)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn tier_ordering_follows_ladder() {
        assert!(Tier::Bronze < Tier::Silver);
        assert!(Tier::Silver < Tier::Gold);
        assert!(Tier::Gold < Tier::Platinum);
    }

    #[test]
    fn tier_parse_round_trips_and_defaults_to_bronze() {
        for tier in Tier::ALL {
            assert_eq!(Tier::parse(tier.as_str()), tier);
        }
        assert_eq!(Tier::parse("diamond"), Tier::Bronze);
    }

    #[test]
    fn visible_tiers_include_own_and_below() {
        assert_eq!(Tier::Bronze.visible_tiers(), vec!["bronze"]);
        assert_eq!(
            Tier::Gold.visible_tiers(),
            vec!["bronze", "silver", "gold"]
        );
    }

    #[test]
    fn parse_questions_accepts_valid_json() {
        let json = r#"[
            {"prompt": "Which tier is highest?", "options": ["Bronze", "Platinum"], "correct_index": 1}
        ]"#;
        let questions = parse_questions_json(json).unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].correct_index, 1);
    }

    #[test]
    fn parse_questions_empty_input_means_no_quiz() {
        assert!(parse_questions_json("").unwrap().is_empty());
        assert!(parse_questions_json("  \n ").unwrap().is_empty());
    }

    #[test]
    fn parse_questions_rejects_bad_shapes() {
        assert!(parse_questions_json("{").is_err());
        assert!(parse_questions_json(r#"[{"prompt": "", "options": ["a","b"], "correct_index": 0}]"#).is_err());
        assert!(parse_questions_json(r#"[{"prompt": "q", "options": ["a"], "correct_index": 0}]"#).is_err());
        assert!(parse_questions_json(r#"[{"prompt": "q", "options": ["a","b"], "correct_index": 2}]"#).is_err());
        assert!(parse_questions_json(r#"[{"prompt": "q", "options": ["a","b"], "correct_index": -1}]"#).is_err());
    }

    #[test]
    fn roi_metrics_lines_become_string_fields() {
        let metrics = parse_roi_metrics("leads: 50\n\nmeetings : 12\nnotes");
        assert_eq!(metrics["leads"], "50");
        assert_eq!(metrics["meetings"], "12");
        assert_eq!(metrics["notes"], "");
    }

    #[test]
    fn roi_metrics_empty_input_is_an_empty_object() {
        assert_eq!(parse_roi_metrics(""), serde_json::json!({}));
    }
}

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Question {
    pub id: String,
    pub text: String,
    #[serde(rename = "qtype")]
    pub kind: QuestionKind,
    pub points: u32,
    pub order: u32,
    #[serde(default)]
    pub choices: Vec<Choice>,
}

/// `is_correct` is only present in teacher-facing payloads; the student view
/// of a question omits it.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Choice {
    pub id: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_correct: Option<bool>,
    pub order: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub enum QuestionKind {
    #[serde(rename = "mcq")]
    MultipleChoice,
    #[serde(rename = "tf")]
    TrueFalse,
    #[serde(rename = "short")]
    ShortAnswer,
}

impl QuestionKind {
    /// Whether answers for this kind are expressed as a choice selection
    /// rather than free text.
    pub fn takes_choice(&self) -> bool {
        match self {
            QuestionKind::MultipleChoice | QuestionKind::TrueFalse => true,
            QuestionKind::ShortAnswer => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_kind_round_trip_serialization() {
        let variants = [
            QuestionKind::MultipleChoice,
            QuestionKind::TrueFalse,
            QuestionKind::ShortAnswer,
        ];

        for variant in variants {
            let json = serde_json::to_string(&variant).expect("variant should serialize");
            let parsed: QuestionKind =
                serde_json::from_str(&json).expect("variant should deserialize");
            assert_eq!(variant, parsed);
        }
    }

    #[test]
    fn question_kind_uses_wire_names() {
        assert_eq!(
            serde_json::to_string(&QuestionKind::MultipleChoice).unwrap(),
            "\"mcq\""
        );
        assert_eq!(serde_json::to_string(&QuestionKind::TrueFalse).unwrap(), "\"tf\"");
        assert_eq!(
            serde_json::to_string(&QuestionKind::ShortAnswer).unwrap(),
            "\"short\""
        );
    }

    #[test]
    fn question_kind_rejects_unknown_variant() {
        let parsed = serde_json::from_str::<QuestionKind>("\"essay\"");
        assert!(parsed.is_err());
    }

    #[test]
    fn student_payload_without_is_correct_parses() {
        let json = r#"{"id":"c-1","text":"Paris","order":0}"#;
        let choice: Choice = serde_json::from_str(json).expect("choice should deserialize");
        assert_eq!(choice.is_correct, None);
    }
}

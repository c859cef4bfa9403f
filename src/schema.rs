//! The fixed survey feature schema.
//!
//! The schema is an ordered list of 23 fields. Order is significant: the
//! fitted pipeline consumes rows positionally, so the same ordering must be
//! used at training and inference time. Any change to this list invalidates
//! existing trained artifacts.

/// Domain of a single survey field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Domain {
    /// Bounded integer, inclusive at both ends (UI range for age).
    Range { min: i64, max: i64 },
    /// Closed set of selectable options.
    Choice(&'static [&'static str]),
}

/// One named survey field with its question text and value domain.
#[derive(Debug, Clone, Copy)]
pub struct Field {
    /// Column name in the training dataset.
    pub name: &'static str,
    /// Question shown to the subject and printed in the report.
    pub question: &'static str,
    pub domain: Domain,
}

impl Field {
    /// Whether this field carries a categorical (string) value.
    pub fn is_categorical(&self) -> bool {
        matches!(self.domain, Domain::Choice(_))
    }
}

/// Name of the target column in the training dataset.
pub const TARGET: &str = "treatment";

/// Reserved encoder-bundle key for the target label encoder.
pub const TARGET_KEY: &str = "__target__";

/// Dataset columns dropped before training, if present.
pub const DROPPED_COLUMNS: &[&str] = &["Timestamp", "state", "comments"];

/// Rows with an age outside these exclusive bounds are discarded at
/// training time.
pub const AGE_OUTLIER_MIN: i64 = 15;
pub const AGE_OUTLIER_MAX: i64 = 100;

const YES_NO: &[&str] = &["Yes", "No"];
const YES_NO_DK: &[&str] = &["Yes", "No", "Don't know"];
const YES_NO_MAYBE: &[&str] = &["Yes", "No", "Maybe"];
const YES_NO_SOME: &[&str] = &["Yes", "No", "Some of them"];

/// The 23 survey fields, in training-time column order.
pub const FEATURES: &[Field] = &[
    Field {
        name: "Age",
        question: "What is your age?",
        domain: Domain::Range { min: 18, max: 100 },
    },
    Field {
        name: "Gender",
        question: "What is your gender?",
        domain: Domain::Choice(&["Male", "Female", "Other"]),
    },
    Field {
        name: "self_employed",
        question: "Are you self-employed?",
        domain: Domain::Choice(YES_NO),
    },
    Field {
        name: "family_history",
        question: "Do you have a family history of mental illness?",
        domain: Domain::Choice(YES_NO),
    },
    Field {
        name: "work_interfere",
        question: "Does your mental health interfere with your work?",
        domain: Domain::Choice(&["Never", "Rarely", "Sometimes", "Often"]),
    },
    Field {
        name: "no_employees",
        question: "How many employees are in your company?",
        domain: Domain::Choice(&["1-5", "6-25", "26-100", "100-500", "500-1000", "More than 1000"]),
    },
    Field {
        name: "remote_work",
        question: "Do you work remotely?",
        domain: Domain::Choice(YES_NO),
    },
    Field {
        name: "tech_company",
        question: "Do you work in a tech company?",
        domain: Domain::Choice(YES_NO),
    },
    Field {
        name: "benefits",
        question: "Does your employer provide mental health benefits?",
        domain: Domain::Choice(YES_NO_DK),
    },
    Field {
        name: "care_options",
        question: "Do you know the mental health care options provided by your employer?",
        domain: Domain::Choice(&["Yes", "No", "Not sure"]),
    },
    Field {
        name: "wellness_program",
        question: "Has your employer ever discussed mental health as part of a wellness program?",
        domain: Domain::Choice(YES_NO_DK),
    },
    Field {
        name: "seek_help",
        question: "Does your employer provide resources to seek help for mental health?",
        domain: Domain::Choice(YES_NO_DK),
    },
    Field {
        name: "anonymity",
        question: "Is anonymity provided for mental health services?",
        domain: Domain::Choice(YES_NO_DK),
    },
    Field {
        name: "leave",
        question: "How easy is it to take mental health leave?",
        domain: Domain::Choice(&[
            "Very easy",
            "Somewhat easy",
            "Somewhat difficult",
            "Very difficult",
            "Don't know",
        ]),
    },
    Field {
        name: "mental_health_consequence",
        question: "Do you think there would be consequences of discussing mental health at work?",
        domain: Domain::Choice(YES_NO_MAYBE),
    },
    Field {
        name: "phys_health_consequence",
        question: "Do you think there would be consequences of discussing physical health at work?",
        domain: Domain::Choice(YES_NO_MAYBE),
    },
    Field {
        name: "coworkers",
        question: "Are you comfortable discussing mental health with coworkers?",
        domain: Domain::Choice(YES_NO_SOME),
    },
    Field {
        name: "supervisor",
        question: "Are you comfortable discussing mental health with your supervisor?",
        domain: Domain::Choice(YES_NO_SOME),
    },
    Field {
        name: "mental_health_interview",
        question: "Would you bring up a mental health issue in a job interview?",
        domain: Domain::Choice(YES_NO_MAYBE),
    },
    Field {
        name: "phys_health_interview",
        question: "Would you bring up a physical health issue in a job interview?",
        domain: Domain::Choice(YES_NO_MAYBE),
    },
    Field {
        name: "mental_vs_physical",
        question: "Do you think mental health is treated the same as physical health?",
        domain: Domain::Choice(YES_NO_DK),
    },
    Field {
        name: "obs_consequence",
        question: "Have you observed consequences of mental health issues in the workplace?",
        domain: Domain::Choice(YES_NO),
    },
    Field {
        name: "Country",
        question: "Which country are you currently residing in?",
        domain: Domain::Choice(&[
            "United States",
            "India",
            "United Kingdom",
            "Canada",
            "Germany",
            "Other",
        ]),
    },
];

/// Look up a schema field by column name.
pub fn field(name: &str) -> Option<&'static Field> {
    FEATURES.iter().find(|f| f.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_has_23_ordered_fields() {
        assert_eq!(FEATURES.len(), 23);
        assert_eq!(FEATURES[0].name, "Age");
        assert_eq!(FEATURES[22].name, "Country");
    }

    #[test]
    fn age_is_the_only_numeric_field() {
        let numeric: Vec<_> = FEATURES.iter().filter(|f| !f.is_categorical()).collect();
        assert_eq!(numeric.len(), 1);
        assert_eq!(numeric[0].name, "Age");
    }

    #[test]
    fn field_lookup() {
        assert!(field("remote_work").is_some());
        assert!(field("treatment").is_none());
    }
}

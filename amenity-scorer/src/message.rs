//! Locale-specific text for scoring verdicts and feedback acknowledgements.
//!
//! Templates are plain strings with `{category}`, `{observed}`, `{required}`
//! and `{deficit}` placeholders. Rendering is a pure function of the
//! [`ScoreResult`], so the same result always yields the same text.
#![forbid(unsafe_code)]

use std::collections::BTreeMap;

use amenity_core::{Category, FeedbackValue};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{ScoreResult, Verdict};

/// Built-in template sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Locale {
    /// English.
    #[default]
    En,
    /// Russian.
    Ru,
}

/// Raised when no built-in template set matches a locale code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported locale '{code}' (expected en or ru)")]
pub struct UnknownLocale {
    /// Code supplied by the caller.
    pub code: String,
}

impl std::str::FromStr for Locale {
    type Err = UnknownLocale;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" | "en-us" | "en-gb" | "english" => Ok(Self::En),
            "ru" | "ru-ru" | "russian" => Ok(Self::Ru),
            _ => Err(UnknownLocale { code: s.to_owned() }),
        }
    }
}

/// Templates for the two verdicts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerdictTemplates {
    /// Used when the deficit is zero.
    pub adequate: String,
    /// Used when facilities are missing.
    pub inadequate: String,
}

impl VerdictTemplates {
    fn for_verdict(&self, verdict: Verdict) -> &str {
        match verdict {
            Verdict::Adequate => &self.adequate,
            Verdict::Inadequate => &self.inadequate,
        }
    }
}

/// Acknowledgements returned after a feedback submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackTemplates {
    /// Reply to an acceptance.
    pub accepted: String,
    /// Reply to a rejection.
    pub rejected: String,
}

/// Complete template set for one locale.
///
/// # Examples
/// ```
/// use amenity_core::Category;
/// use amenity_scorer::{MessageTemplates, ScoreResult, Verdict};
///
/// let result = ScoreResult {
///     category: Category::School,
///     observed_count: 50,
///     named_count: 50,
///     required_count: 70,
///     deficit: 20,
///     verdict: Verdict::Inadequate,
///     locations: Vec::new(),
/// };
/// let text = MessageTemplates::english().render(&result);
/// assert_eq!(
///     text,
///     "Not enough school facilities: 50 found, 70 required. Consider adding 20."
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageTemplates {
    /// Fallback verdict templates.
    pub verdicts: VerdictTemplates,
    /// Verdict templates overriding the fallback for specific categories.
    #[serde(default)]
    pub per_category: BTreeMap<Category, VerdictTemplates>,
    /// Display names substituted for `{category}`; the lowercase identifier
    /// is used when a category has no label.
    #[serde(default)]
    pub labels: BTreeMap<Category, String>,
    /// Feedback acknowledgements.
    pub feedback: FeedbackTemplates,
}

impl MessageTemplates {
    /// Built-in template set for `locale`.
    #[must_use]
    pub fn for_locale(locale: Locale) -> Self {
        match locale {
            Locale::En => Self::english(),
            Locale::Ru => Self::russian(),
        }
    }

    /// English templates.
    #[must_use]
    pub fn english() -> Self {
        Self {
            verdicts: VerdictTemplates {
                adequate: "There are enough {category} facilities: {observed} found, \
                           {required} required."
                    .to_owned(),
                inadequate: "Not enough {category} facilities: {observed} found, \
                             {required} required. Consider adding {deficit}."
                    .to_owned(),
            },
            per_category: BTreeMap::new(),
            labels: BTreeMap::new(),
            feedback: FeedbackTemplates {
                accepted: "Thank you for confirming.".to_owned(),
                rejected: "We will take your feedback into account and improve the \
                           recommendation."
                    .to_owned(),
            },
        }
    }

    /// Russian templates.
    #[must_use]
    pub fn russian() -> Self {
        let labels = [
            (Category::School, "школы"),
            (Category::Hospital, "больницы"),
            (Category::Park, "парки"),
            (Category::Restaurant, "рестораны"),
            (Category::Pharmacy, "аптеки"),
            (Category::Gym, "спортзалы"),
            (Category::Library, "библиотеки"),
            (Category::Mall, "торговые центры"),
        ]
        .into_iter()
        .map(|(category, label)| (category, label.to_owned()))
        .collect();
        Self {
            verdicts: VerdictTemplates {
                adequate: "В категории «{category}» достаточно объектов: найдено {observed}, \
                           требуется {required}."
                    .to_owned(),
                inadequate: "Недостаточно объектов категории «{category}»: найдено {observed}, \
                             требуется {required}. Рекомендуется добавить {deficit}."
                    .to_owned(),
            },
            per_category: BTreeMap::new(),
            labels,
            feedback: FeedbackTemplates {
                accepted: "Спасибо за подтверждение.".to_owned(),
                rejected: "Мы учтём ваш отзыв и улучшим рекомендацию.".to_owned(),
            },
        }
    }

    /// Display name used for `category`.
    #[must_use]
    pub fn label(&self, category: Category) -> &str {
        self.labels
            .get(&category)
            .map_or_else(|| category.as_str(), String::as_str)
    }

    /// Render the message for a scoring result.
    ///
    /// Placeholders are substituted in a single pass, so text inserted for
    /// one placeholder (such as a label containing braces) is never expanded
    /// again. Unknown placeholders are kept verbatim.
    #[must_use]
    pub fn render(&self, result: &ScoreResult) -> String {
        let template = self
            .per_category
            .get(&result.category)
            .unwrap_or(&self.verdicts)
            .for_verdict(result.verdict);
        fill(template, |name| match name {
            "category" => Some(self.label(result.category).to_owned()),
            "observed" => Some(result.observed_count.to_string()),
            "required" => Some(result.required_count.to_string()),
            "deficit" => Some(result.deficit.to_string()),
            _ => None,
        })
    }

    /// Acknowledgement for a feedback submission.
    #[must_use]
    pub fn render_feedback_ack(&self, value: FeedbackValue) -> &str {
        match value {
            FeedbackValue::Accept => &self.feedback.accepted,
            FeedbackValue::Reject => &self.feedback.rejected,
        }
    }
}

impl Default for MessageTemplates {
    fn default() -> Self {
        Self::english()
    }
}

fn fill(template: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut rendered = String::with_capacity(template.len());
    let mut rest = template;
    while let Some((before, opened)) = rest.split_once('{') {
        rendered.push_str(before);
        let substituted = opened
            .split_once('}')
            .and_then(|(name, after)| lookup(name).map(|value| (value, after)));
        match substituted {
            Some((value, after)) => {
                rendered.push_str(&value);
                rest = after;
            }
            None => {
                rendered.push('{');
                rest = opened;
            }
        }
    }
    rendered.push_str(rest);
    rendered
}

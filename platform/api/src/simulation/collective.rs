use super::simulate;
use crate::config::SimulationConfig;
use crate::service::{Result, ServiceError};

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct CollectiveResponse {
	pub theme: &'static str,
	pub poem: &'static str,
	pub question: String,
}

struct Template {
	theme: &'static str,
	keywords: &'static [&'static str],
	poem: &'static str,
}

const TEMPLATES: &[Template] = &[
	Template {
		theme: "love",
		keywords: &["love", "heart"],
		poem: "In the quiet space between two heartbeats,\nwe found a language older than words,\nwhere every silence spoke of you.",
	},
	Template {
		theme: "nature",
		keywords: &["nature", "tree", "ocean", "sky"],
		poem: "The ocean keeps the sky's reflection,\nthe trees keep the memory of rain,\nand we keep walking, small and listening.",
	},
	Template {
		theme: "time",
		keywords: &["time", "death", "memory"],
		poem: "Time folds like paper in an old drawer,\neach crease a memory we meant to keep,\neach edge softened by the hands of years.",
	},
];

const DEFAULT_TEMPLATE: Template = Template {
	theme: "collective",
	keywords: &[],
	poem: "A thousand voices, one slow breath,\nwe write together what none could write alone,\nthe poem is the question, answered.",
};

/// Picks the first template with a keyword contained in the question.
pub fn match_template(question: &str) -> (&'static str, &'static str) {
	let question = question.to_lowercase();

	let template = TEMPLATES
		.iter()
		.find(|template| template.keywords.iter().any(|keyword| question.contains(keyword)))
		.unwrap_or(&DEFAULT_TEMPLATE);

	(template.theme, template.poem)
}

#[tracing::instrument(skip(config))]
pub async fn query(config: &SimulationConfig, question: &str) -> Result<CollectiveResponse> {
	let question = question.trim();
	if question.is_empty() {
		return Err(ServiceError::BadRequest("question must not be empty".into()));
	}

	simulate(config).await?;

	let (theme, poem) = match_template(question);

	Ok(CollectiveResponse {
		theme,
		poem,
		question: question.to_owned(),
	})
}

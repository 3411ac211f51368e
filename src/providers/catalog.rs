use serde::Serialize;

pub const OPENAI_MODELS: &[&str] = &[
    "gpt-4o",
    "gpt-4o-mini",
    "gpt-4-turbo",
    "gpt-4",
    "gpt-3.5-turbo",
];

pub const ANTHROPIC_MODELS: &[&str] = &[
    "claude-3-5-sonnet-20240620",
    "claude-3-opus-20240229",
    "claude-3-sonnet-20240229",
    "claude-3-haiku-20240307",
];

/// Models advertised to the frontend, grouped by provider
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ModelCatalog {
    pub openai: &'static [&'static str],
    pub anthropic: &'static [&'static str],
}

pub fn catalog() -> ModelCatalog {
    ModelCatalog {
        openai: OPENAI_MODELS,
        anthropic: ANTHROPIC_MODELS,
    }
}

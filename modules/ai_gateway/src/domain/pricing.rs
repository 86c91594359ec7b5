//! Static vendor price list

use crate::contract::{ProviderKind, TokenUsage};

/// (provider, model prefix, USD per million input tokens, USD per million output tokens)
const PRICES: &[(ProviderKind, &str, f64, f64)] = &[
    (ProviderKind::OpenAi, "gpt-4o-mini", 0.15, 0.60),
    (ProviderKind::OpenAi, "gpt-4o", 2.50, 10.00),
    (ProviderKind::OpenAi, "gpt-4.1-nano", 0.10, 0.40),
    (ProviderKind::OpenAi, "gpt-4.1-mini", 0.40, 1.60),
    (ProviderKind::OpenAi, "gpt-4.1", 2.00, 8.00),
    (ProviderKind::OpenAi, "gpt-3.5-turbo", 0.50, 1.50),
    (ProviderKind::OpenAi, "o3-mini", 1.10, 4.40),
    (ProviderKind::Claude, "claude-3-5-haiku", 0.80, 4.00),
    (ProviderKind::Claude, "claude-3-haiku", 0.25, 1.25),
    (ProviderKind::Claude, "claude-3-5-sonnet", 3.00, 15.00),
    (ProviderKind::Claude, "claude-3-7-sonnet", 3.00, 15.00),
    (ProviderKind::Claude, "claude-sonnet-4", 3.00, 15.00),
    (ProviderKind::Claude, "claude-3-opus", 15.00, 75.00),
    (ProviderKind::Claude, "claude-opus-4", 15.00, 75.00),
    (ProviderKind::Gemini, "gemini-1.5-flash", 0.075, 0.30),
    (ProviderKind::Gemini, "gemini-1.5-pro", 1.25, 5.00),
    (ProviderKind::Gemini, "gemini-2.0-flash", 0.10, 0.40),
    (ProviderKind::Gemini, "gemini-2.5-pro", 1.25, 10.00),
    (ProviderKind::Groq, "llama-3.1-8b-instant", 0.05, 0.08),
    (ProviderKind::Groq, "llama-3.3-70b", 0.59, 0.79),
    (ProviderKind::Groq, "mixtral-8x7b", 0.24, 0.24),
    (ProviderKind::OpenRouter, "openai/gpt-4o-mini", 0.15, 0.60),
    (ProviderKind::OpenRouter, "openai/gpt-4o", 2.50, 10.00),
    (ProviderKind::OpenRouter, "anthropic/claude-3.5-sonnet", 3.00, 15.00),
    (ProviderKind::OpenRouter, "meta-llama/llama-3.1-8b-instruct", 0.05, 0.05),
    (ProviderKind::Copilot, "gpt-4o-mini", 0.165, 0.66),
    (ProviderKind::Copilot, "gpt-4o", 2.50, 10.00),
    (ProviderKind::Copilot, "gpt-35-turbo", 0.50, 1.50),
];

/// Price per million tokens for a model; longest matching prefix wins
pub fn price_for(provider: ProviderKind, model: &str) -> Option<(f64, f64)> {
    let model = model.to_ascii_lowercase();
    PRICES
        .iter()
        .filter(|(kind, prefix, _, _)| *kind == provider && model.starts_with(prefix))
        .max_by_key(|(_, prefix, _, _)| prefix.len())
        .map(|(_, _, input, output)| (*input, *output))
}

/// Estimated cost in micro-dollars; unknown models are free
pub fn cost_micros(provider: ProviderKind, model: &str, usage: TokenUsage) -> i64 {
    let Some((input, output)) = price_for(provider, model) else {
        return 0;
    };
    // USD per million tokens == micro-dollars per token
    let cost = f64::from(usage.input_tokens) * input + f64::from(usage.output_tokens) * output;
    cost.round() as i64
}

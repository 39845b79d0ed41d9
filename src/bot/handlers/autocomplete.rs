//! Autocomplete handlers for Discord slash command parameters.
//!
//! Suggestions come straight from the in-memory catalog and guide library, so
//! these handlers never fail. Matching is a case-insensitive substring test.

use crate::{bot::BotData, core::compare::ALL, errors::Error};

/// Discord autocomplete limit.
const MAX_SUGGESTIONS: usize = 25;

fn matching<'a>(options: impl IntoIterator<Item = &'a str>, partial: &str) -> Vec<String> {
    let partial_lower = partial.to_lowercase();
    options
        .into_iter()
        .filter(|opt| opt.to_lowercase().contains(&partial_lower))
        .map(str::to_string)
        .take(MAX_SUGGESTIONS)
        .collect()
}

/// Suggests product names, chemical products first and organic alternatives after.
pub async fn autocomplete_product_name(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let catalog = &ctx.data().catalog;
    let names = catalog
        .chemical()
        .chain(catalog.organic())
        .map(|p| p.name.as_str());
    matching(names, partial)
}

/// Suggests product types, led by the "All" sentinel.
pub async fn autocomplete_product_type(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let types = ctx.data().catalog.type_options();
    matching(
        std::iter::once(ALL).chain(types.iter().map(|t| t.label())),
        partial,
    )
}

/// Suggests crops, led by the "All" sentinel.
pub async fn autocomplete_crop(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let crops = ctx.data().catalog.crop_options();
    matching(
        std::iter::once(ALL).chain(crops.iter().map(String::as_str)),
        partial,
    )
}

/// Suggests guide ids. Typing part of a title also matches.
pub async fn autocomplete_guide(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let partial_lower = partial.to_lowercase();
    ctx.data()
        .guides
        .iter()
        .filter(|g| {
            g.id.to_lowercase().contains(&partial_lower)
                || g.title.to_lowercase().contains(&partial_lower)
        })
        .map(|g| g.id.clone())
        .take(MAX_SUGGESTIONS)
        .collect()
}

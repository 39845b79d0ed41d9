//! Price comparison command - `/compare`.
//!
//! Filters the catalog by free-text search, product type, and crop and shows the
//! matching rows in catalog order.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, handlers::autocomplete},
        core::compare::{self, CropFilter, ProductFilter, TypeFilter},
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;
    use tracing::info;

    /// Compares product prices and application rates.
    ///
    /// All filters are optional; leaving one out (or choosing "All") disables it.
    #[poise::command(slash_command)]
    pub async fn compare(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Search by product name or manufacturer"] search: Option<String>,
        #[description = "Filter by product type"]
        #[autocomplete = "autocomplete::autocomplete_product_type"]
        product_type: Option<String>,
        #[description = "Filter by crop"]
        #[autocomplete = "autocomplete::autocomplete_crop"]
        crop: Option<String>,
    ) -> Result<()> {
        let type_filter = match TypeFilter::parse(product_type.as_deref().unwrap_or_default()) {
            Ok(filter) => filter,
            Err(message) => {
                ctx.say(format!("❌ {message}. Pick a type from the suggestions."))
                    .await?;
                return Ok(());
            }
        };
        let filter = ProductFilter::new(
            type_filter,
            CropFilter::parse(crop.as_deref().unwrap_or_default()),
            search.as_deref().unwrap_or_default(),
        );
        info!(
            "Comparing products: type={}, crop={}, search={:?}",
            filter.product_type,
            filter.crop,
            filter.search()
        );

        let catalog = &ctx.data().catalog;
        let matches = filter.apply(catalog);

        if matches.clone().next().is_none() {
            ctx.say("No products found matching your filters.").await?;
            return Ok(());
        }

        let fields: Vec<(String, String, bool)> = matches
            .map(|product| {
                let organic_badge = if product.is_organic() { "🌱 " } else { "" };
                (
                    format!("{} ({})", product.name, product.manufacturer),
                    format!(
                        "{organic_badge}{}\nActive ingredient: {}\nRate: {}\nPrice: {}",
                        product.product_type,
                        product.active_ingredient,
                        compare::format_rate(product),
                        compare::format_price(product),
                    ),
                    false,
                )
            })
            .collect();

        let embed = serenity::CreateEmbed::default()
            .title("**Pesticide Price Comparison**")
            .description(format!(
                "Type: {} · Crop: {}{}",
                filter.product_type,
                filter.crop,
                if filter.search().is_empty() {
                    String::new()
                } else {
                    format!(" · Search: \"{}\"", filter.search())
                }
            ))
            .color(0x0016_A34A) // green
            .fields(fields)
            .footer(serenity::CreateEmbedFooter::new(
                "Use /contact to find a vendor.",
            ));

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }
}

pub use inner::*;

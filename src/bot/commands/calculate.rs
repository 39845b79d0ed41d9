//! Treatment cost calculator command - `/calculate`.
//!
//! Each user has one calculator session. Arguments update its inputs; anything
//! left out keeps its previous value. Picking a product pre-fills its minimum
//! recommended rate. When the inputs cannot produce a result, the previous
//! result (if any) is shown unchanged.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, handlers::autocomplete},
        core::calculator::{format_breakdown, format_currency, price_per_ounce},
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;
    use tracing::info;

    /// Estimates chemical vs. organic treatment costs per acre.
    #[poise::command(slash_command)]
    pub async fn calculate(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Product to apply"]
        #[autocomplete = "autocomplete::autocomplete_product_name"]
        product: Option<String>,
        #[description = "Area to treat, in acres"] acres: Option<f64>,
        #[description = "Application rate in oz/acre (defaults to the product's minimum)"]
        rate: Option<f64>,
        #[description = "Labor cost in $/acre"] labor: Option<f64>,
    ) -> Result<()> {
        let data = ctx.data();
        let catalog = &data.catalog;

        let selected = match product.as_deref().map(|name| catalog.resolve(name)).transpose() {
            Ok(selected) => selected,
            Err(e) => {
                ctx.say(format!("❌ {e}")).await?;
                return Ok(());
            }
        };

        let user_id = ctx.author().id.get();
        let (outcome, shown, product_id, acres, rate, labor) = data
            .with_calculator(user_id, |session| {
                if let Some(p) = selected {
                    session.select_product(p);
                }
                if let Some(a) = acres {
                    session.set_acres(a);
                }
                if let Some(r) = rate {
                    session.set_application_rate(r);
                }
                if let Some(l) = labor {
                    session.set_labor_cost_per_acre(l);
                }
                let outcome = session.calculate(catalog);
                (
                    outcome,
                    session.last_result().copied(),
                    session.selected_product().map(str::to_string),
                    session.acres(),
                    session.application_rate(),
                    session.labor_cost_per_acre(),
                )
            })
            .await;

        let selected_product = product_id.as_deref().and_then(|id| catalog.get(id));
        info!(
            "Calculator for user {user_id}: product={:?}, acres={acres}, rate={rate}, labor={labor}, computed={}",
            product_id,
            outcome.is_some()
        );

        let Some(result) = shown else {
            ctx.say("Enter parameters to view cost estimate: pick a product and a positive area and rate.")
                .await?;
            return Ok(());
        };

        let mut inputs = format!(
            "Area: {acres} acres · Rate: {rate} oz/acre · Labor: {}/acre",
            format_currency(labor)
        );
        if let Some(p) = selected_product {
            inputs = format!(
                "**{}** ({} per oz, rec. {}-{} {})\n{inputs}",
                p.name,
                format_currency(price_per_ounce(p)),
                p.rate_min,
                p.rate_max,
                p.rate_unit
            );
        }

        let mut embed = serenity::CreateEmbed::default()
            .title("**Estimated Breakdown**")
            .description(inputs)
            .field("Result", format_breakdown(&result), false)
            .color(0x0016_A34A); // green
        if outcome.is_none() {
            embed = embed.footer(serenity::CreateEmbedFooter::new(
                "Inputs incomplete; showing your previous estimate.",
            ));
        }

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }
}

pub use inner::*;

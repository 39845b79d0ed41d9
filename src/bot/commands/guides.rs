//! Resource guide commands - `/guides`, `/guide`, and `/guide_close`.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, fit_message, handlers::autocomplete},
        entities::ResourceGuide,
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;

    fn guide_embed(guide: &ResourceGuide) -> serenity::CreateEmbed {
        serenity::CreateEmbed::default()
            .title(&guide.title)
            .description(fit_message(&guide.content))
            .color(0x0016_A34A) // green
            .footer(serenity::CreateEmbedFooter::new(format!(
                "Guide {} · /guide_close to go back",
                guide.id
            )))
    }

    /// Lists the organic-transition and safety resource guides.
    #[poise::command(slash_command)]
    pub async fn guides(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let fields: Vec<(String, String, bool)> = ctx
            .data()
            .guides
            .iter()
            .map(|g| (format!("{} · `{}`", g.title, g.id), g.summary.clone(), false))
            .collect();

        let embed = serenity::CreateEmbed::default()
            .title("**Organic Alternatives & Resources**")
            .description("Open one with `/guide <id>`.")
            .color(0x0016_A34A)
            .fields(fields);

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }

    /// Opens a resource guide.
    #[poise::command(slash_command)]
    pub async fn guide(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Guide to open"]
        #[autocomplete = "autocomplete::autocomplete_guide"]
        id: String,
    ) -> Result<()> {
        let data = ctx.data();
        let opened = data
            .with_viewer(ctx.author().id.get(), |viewer| {
                viewer.open(&data.guides, &id).cloned()
            })
            .await;

        match opened {
            Ok(guide) => {
                ctx.send(
                    poise::CreateReply::default()
                        .embed(guide_embed(&guide))
                        .ephemeral(true),
                )
                .await?;
            }
            Err(e @ Error::GuideNotFound { .. }) => {
                ctx.say(format!("❌ {e}. Use `/guides` to see what's available."))
                    .await?;
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }

    /// Closes the open guide and returns to the one shown before it.
    #[poise::command(slash_command)]
    pub async fn guide_close(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let data = ctx.data();
        let previous = data
            .with_viewer(ctx.author().id.get(), |viewer| {
                viewer.close().map(str::to_string)
            })
            .await;

        match previous.as_deref().map(|id| data.guides.get(id)) {
            Some(Ok(guide)) => {
                ctx.send(
                    poise::CreateReply::default()
                        .embed(guide_embed(guide))
                        .ephemeral(true),
                )
                .await?;
            }
            _ => {
                ctx.send(
                    poise::CreateReply::default()
                        .content("Guide closed.")
                        .ephemeral(true),
                )
                .await?;
            }
        }
        Ok(())
    }
}

pub use inner::*;

//! AI agronomist commands - `/ask` and `/ask_reset`.
//!
//! Each channel has one conversation. While an answer is pending in a channel,
//! further questions there are turned away until it arrives.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, fit_message},
        core::chat::SubmitRejection,
        errors::{Error, Result},
    };
    use tracing::info;

    /// Asks the AI Agronomist about pests, application rates, safety, or organic options.
    #[poise::command(slash_command)]
    pub async fn ask(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Your question"] question: String,
    ) -> Result<()> {
        let channel = ctx.channel_id().get();

        // Backend calls can take longer than Discord's 3s acknowledgement window
        ctx.defer().await?;

        match ctx.data().chat.ask(channel, &question).await {
            Ok(answer) => {
                info!(
                    "Agronomist answered in channel {channel} with {} source(s)",
                    answer.sources.len()
                );
                let reply = format!("> {}\n\n{}", question.trim(), answer.render());
                ctx.say(fit_message(&reply)).await?;
            }
            Err(SubmitRejection::Empty) => {
                ctx.say("Please type a question first.").await?;
            }
            Err(SubmitRejection::Busy) => {
                ctx.say("⏳ Still working on the previous question in this channel. Please wait for the answer.")
                    .await?;
            }
        }
        Ok(())
    }

    /// Starts a fresh AI Agronomist conversation in this channel.
    #[poise::command(slash_command)]
    pub async fn ask_reset(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let channel = ctx.channel_id().get();
        let existed = ctx.data().chat.reset(channel).await;
        let message = if existed {
            "🧹 Conversation cleared. Ask away!"
        } else {
            "No conversation to clear yet."
        };
        ctx.say(message).await?;
        Ok(())
    }
}

pub use inner::*;

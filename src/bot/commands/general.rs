//! General Discord commands - ping and help.
//! These need no shared state and provide basic bot functionality and user assistance.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        errors::{Error, Result},
    };

    /// Responds with "Pong!" to test bot connectivity.
    #[poise::command(slash_command, prefix_command)]
    pub async fn ping(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Displays help information about available commands.
    #[poise::command(slash_command, prefix_command)]
    pub async fn help(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "**FarmGuard Help**\n\
        Compare crop-protection products, estimate treatment costs, and ask the AI Agronomist.\n\n\
        **Products & Costs**\n\
        • `/compare [search] [product_type] [crop]` - Compare prices and rates across products.\n\
        • `/calculate [product] [acres] [rate] [labor]` - Estimate treatment cost per acre. \
        Inputs you leave out keep their previous values.\n\n\
        **Learning**\n\
        • `/guides` - List resource guides.\n\
        • `/guide <id>` - Open a guide. `/guide_close` goes back to the previous one.\n\
        • `/ask <question>` - Ask the AI Agronomist. `/ask_reset` starts a new conversation.\n\n\
        **Suppliers**\n\
        • `/contact <name> <email> <message>` - Request a bulk quote from local vendors.\n\n\
        **Utility**\n\
        • `/ping` - Checks if the bot is responsive.\n\
        • `/help` - Shows this help message.\n\n\
        AI can make mistakes. Always verify with product labels and local experts.";

        ctx.say(help_text).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;

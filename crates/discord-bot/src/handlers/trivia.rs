use eyre::Result;
use medley_core::{
    models::trivia::{Difficulty, TriviaQuestion},
    text::SELECT_MENU_LIMIT,
};
use serenity::{
    builder::CreateComponents,
    model::{
        application::{
            component::ButtonStyle,
            interaction::{
                InteractionResponseType,
                application_command::ApplicationCommandInteraction,
                message_component::MessageComponentInteraction,
            },
        },
        id::MessageId,
    },
};
use tokio::time::sleep;
use tracing::{debug, error, warn};

use crate::{
    handlers::{HandlerContext, apology},
    trivia::{
        ANSWER_PREFIX, ANY_VALUE, Access, ActiveQuestion, AnswerOutcome, CATEGORY_SELECT_ID,
        DIFFICULTY_SELECT_ID, QUESTION_TIMEOUT, SETUP_TIMEOUT, START_BUTTON_ID, TriviaSetup,
        answer_id, parse_answer_id, parse_category_value, parse_difficulty_value,
    },
};

const NOT_YOUR_QUESTION: &str = "This isn't your question!";
const NOT_YOUR_GAME: &str = "This isn't your trivia game!";
const EXPIRED: &str = "This trivia game has expired.";

pub fn setup_message(setup: &TriviaSetup) -> String {
    format!(
        "🧠 **Trivia time!** Pick a category and difficulty, then press Start.\n\nCategory: **{}**\nDifficulty: **{}**",
        setup.category_name(),
        setup.difficulty_label()
    )
}

pub fn answer_message(outcome: &AnswerOutcome) -> String {
    match outcome {
        AnswerOutcome::Correct => "🎉 Correct!".to_string(),
        AnswerOutcome::Wrong { correct } => format!("❌ Nope—correct was **{}**.", correct),
    }
}

/// Category select, difficulty select and the Start button.
pub fn setup_components<'a>(
    components: &'a mut CreateComponents,
    setup: &TriviaSetup,
) -> &'a mut CreateComponents {
    components
        .create_action_row(|row| {
            row.create_select_menu(|menu| {
                menu.custom_id(CATEGORY_SELECT_ID)
                    .placeholder("Any category")
                    .options(|opts| {
                        opts.create_option(|o| {
                            o.label("Any category")
                                .value(ANY_VALUE)
                                .default_selection(setup.category.is_none())
                        });
                        // One slot is taken by "Any category"
                        for category in setup.categories.iter().take(SELECT_MENU_LIMIT - 1) {
                            opts.create_option(|o| {
                                o.label(&category.name)
                                    .value(category.id)
                                    .default_selection(setup.category == Some(category.id))
                            });
                        }
                        opts
                    })
            })
        })
        .create_action_row(|row| {
            row.create_select_menu(|menu| {
                menu.custom_id(DIFFICULTY_SELECT_ID)
                    .placeholder("Any difficulty")
                    .options(|opts| {
                        opts.create_option(|o| {
                            o.label("Any difficulty")
                                .value(ANY_VALUE)
                                .default_selection(setup.difficulty.is_none())
                        });
                        for difficulty in Difficulty::ALL {
                            opts.create_option(|o| {
                                o.label(difficulty.label())
                                    .value(difficulty.as_str())
                                    .default_selection(setup.difficulty == Some(difficulty))
                            });
                        }
                        opts
                    })
            })
        })
        .create_action_row(|row| {
            row.create_button(|b| {
                b.custom_id(START_BUTTON_ID)
                    .label("Start")
                    .style(ButtonStyle::Success)
            })
        })
}

/// One numbered button per option, five to a row.
pub fn answer_components(
    components: &mut CreateComponents,
    option_count: usize,
    disabled: bool,
) -> &mut CreateComponents {
    let indices: Vec<usize> = (0..option_count).collect();
    for chunk in indices.chunks(5) {
        components.create_action_row(|row| {
            for &index in chunk {
                row.create_button(|b| {
                    b.custom_id(answer_id(index))
                        .label((index + 1).to_string())
                        .style(ButtonStyle::Primary)
                        .disabled(disabled)
                });
            }
            row
        });
    }
    components
}

/// Handle the /trivia command
pub async fn handle_trivia_command(
    ctx: HandlerContext,
    command: &ApplicationCommandInteraction,
) -> Result<()> {
    let categories = ctx.services.trivia.categories().await?;
    let setup = TriviaSetup::new(command.user.id.0, categories);

    command
        .create_interaction_response(&ctx.ctx.http, |r| {
            r.kind(InteractionResponseType::ChannelMessageWithSource)
                .interaction_response_data(|m| {
                    m.content(setup_message(&setup))
                        .components(|c| setup_components(c, &setup))
                })
        })
        .await?;

    let message = command.get_interaction_response(&ctx.ctx.http).await?;
    ctx.trivia.open_setup(message.id.0, setup).await;

    // Close the wizard if nobody starts it in time
    let state = ctx.trivia.clone();
    let http = ctx.ctx.http.clone();
    let command = command.clone();
    tokio::spawn(async move {
        sleep(SETUP_TIMEOUT).await;
        if state.expire_setup(message.id.0).await.is_some() {
            debug!(message_id = message.id.0, "Trivia setup expired");
            if let Err(why) = command
                .edit_original_interaction_response(&http, |r| {
                    r.content("⏰ Trivia setup expired.").components(|c| c)
                })
                .await
            {
                warn!("Failed to close expired trivia setup: {:?}", why);
            }
        }
    });

    Ok(())
}

/// Handle select menus and buttons on trivia messages
pub async fn handle_component_interaction(
    ctx: HandlerContext,
    component: &MessageComponentInteraction,
) -> Result<()> {
    let custom_id = component.data.custom_id.as_str();

    match custom_id {
        CATEGORY_SELECT_ID | DIFFICULTY_SELECT_ID => handle_setup_choice(ctx, component).await,
        START_BUTTON_ID => handle_start(ctx, component).await,
        _ if custom_id.starts_with(ANSWER_PREFIX) => handle_answer(ctx, component).await,
        _ => {
            debug!("Ignoring unknown component {}", custom_id);
            Ok(())
        }
    }
}

async fn handle_setup_choice(
    ctx: HandlerContext,
    component: &MessageComponentInteraction,
) -> Result<()> {
    let value = component
        .data
        .values
        .first()
        .map(String::as_str)
        .unwrap_or(ANY_VALUE);
    let is_category = component.data.custom_id == CATEGORY_SELECT_ID;

    let access = ctx
        .trivia
        .update_setup(component.message.id.0, component.user.id.0, |setup| {
            if is_category {
                setup.category = parse_category_value(value);
            } else {
                setup.difficulty = parse_difficulty_value(value);
            }
        })
        .await;

    match access {
        Access::Granted(setup) => {
            component
                .create_interaction_response(&ctx.ctx.http, |r| {
                    r.kind(InteractionResponseType::UpdateMessage)
                        .interaction_response_data(|m| {
                            m.content(setup_message(&setup))
                                .components(|c| setup_components(c, &setup))
                        })
                })
                .await?;
            Ok(())
        }
        Access::NotYours => notify(&ctx, component, NOT_YOUR_GAME).await,
        Access::Expired => notify(&ctx, component, EXPIRED).await,
    }
}

async fn handle_start(ctx: HandlerContext, component: &MessageComponentInteraction) -> Result<()> {
    let setup = match ctx
        .trivia
        .take_setup(component.message.id.0, component.user.id.0)
        .await
    {
        Access::Granted(setup) => setup,
        Access::NotYours => return notify(&ctx, component, NOT_YOUR_GAME).await,
        Access::Expired => return notify(&ctx, component, EXPIRED).await,
    };

    // Acknowledge and remove the wizard while the question loads
    component
        .create_interaction_response(&ctx.ctx.http, |r| {
            r.kind(InteractionResponseType::UpdateMessage)
                .interaction_response_data(|m| {
                    m.content(format!(
                        "Fetching your question ({} · {})…",
                        setup.category_name(),
                        setup.difficulty_label()
                    ))
                    .components(|c| c)
                })
        })
        .await?;

    let question = match ctx
        .services
        .trivia
        .question(setup.category, setup.difficulty)
        .await
    {
        Ok(question) => question,
        Err(e) => {
            error!("Trivia error: {:?}", e);
            component
                .edit_original_interaction_response(&ctx.ctx.http, |r| r.content(apology(&e)))
                .await?;
            return Ok(());
        }
    };

    let message_id = component.message.id;
    let option_count = question.options.len();
    let prompt = question.prompt();

    // Register before the buttons become clickable
    ctx.trivia
        .ask(
            message_id.0,
            ActiveQuestion {
                user_id: setup.user_id,
                question: question.clone(),
            },
        )
        .await;

    if let Err(e) = component
        .edit_original_interaction_response(&ctx.ctx.http, |r| {
            r.content(&prompt)
                .components(|c| answer_components(c, option_count, false))
        })
        .await
    {
        ctx.trivia.expire_question(message_id.0).await;
        return Err(e.into());
    }

    schedule_question_expiry(&ctx, component, message_id, question);
    Ok(())
}

fn schedule_question_expiry(
    ctx: &HandlerContext,
    component: &MessageComponentInteraction,
    message_id: MessageId,
    question: TriviaQuestion,
) {
    let state = ctx.trivia.clone();
    let http = ctx.ctx.http.clone();
    let channel_id = component.channel_id;

    tokio::spawn(async move {
        sleep(QUESTION_TIMEOUT).await;
        if state.expire_question(message_id.0).await.is_some() {
            debug!(message_id = message_id.0, "Trivia question expired");
            if let Err(why) = channel_id
                .edit_message(&http, message_id, |m| {
                    m.components(|c| answer_components(c, question.options.len(), true))
                })
                .await
            {
                warn!("Failed to disable expired trivia buttons: {:?}", why);
            }
        }
    });
}

async fn handle_answer(ctx: HandlerContext, component: &MessageComponentInteraction) -> Result<()> {
    let Some(choice) = parse_answer_id(&component.data.custom_id) else {
        return Ok(());
    };

    let outcome = match ctx
        .trivia
        .answer(component.message.id.0, component.user.id.0, choice)
        .await
    {
        Access::Granted(outcome) => outcome,
        Access::NotYours => return notify(&ctx, component, NOT_YOUR_QUESTION).await,
        Access::Expired => return notify(&ctx, component, EXPIRED).await,
    };

    // Lock the buttons, then announce the result to the whole channel
    let option_count: usize = component
        .message
        .components
        .iter()
        .map(|row| row.components.len())
        .sum();

    component
        .create_interaction_response(&ctx.ctx.http, |r| {
            r.kind(InteractionResponseType::UpdateMessage)
                .interaction_response_data(|m| {
                    m.components(|c| answer_components(c, option_count, true))
                })
        })
        .await?;

    component
        .create_followup_message(&ctx.ctx.http, |m| m.content(answer_message(&outcome)))
        .await?;

    Ok(())
}

async fn notify(
    ctx: &HandlerContext,
    component: &MessageComponentInteraction,
    content: &str,
) -> Result<()> {
    component
        .create_interaction_response(&ctx.ctx.http, |r| {
            r.kind(InteractionResponseType::ChannelMessageWithSource)
                .interaction_response_data(|m| m.content(content).ephemeral(true))
        })
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use medley_core::models::trivia::TriviaCategory;
    use pretty_assertions::assert_eq;

    #[test]
    fn answer_messages_are_public_wording() {
        assert_eq!(answer_message(&AnswerOutcome::Correct), "🎉 Correct!");
        assert_eq!(
            answer_message(&AnswerOutcome::Wrong { correct: "Paris".to_string() }),
            "❌ Nope—correct was **Paris**."
        );
    }

    #[test]
    fn setup_message_shows_choices() {
        let mut setup = TriviaSetup::new(
            1,
            vec![TriviaCategory { id: 18, name: "Science: Computers".to_string() }],
        );
        setup.category = Some(18);
        setup.difficulty = Some(Difficulty::Hard);

        let message = setup_message(&setup);
        assert!(message.contains("Category: **Science: Computers**"));
        assert!(message.contains("Difficulty: **Hard**"));
    }

    #[test]
    fn answer_buttons_wrap_after_five() {
        let mut components = CreateComponents::default();
        answer_components(&mut components, 6, false);
        assert_eq!(components.0.len(), 2);
    }
}

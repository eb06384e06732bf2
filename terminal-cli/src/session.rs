use std::fmt::Display;
use std::io::{BufRead, Write};

use anyhow::Result;
use pollbet_execution::{OutcomeSource, Phase, RoundController, RoundError, Store};
use tracing::debug;

use crate::commands::{handle_line, CommandAction};

/// Read commands from `input` until `/quit` or end of input.
///
/// Rejected requests are printed and the loop continues; store failures end the session.
pub fn run<S, R, B, W>(round: &mut RoundController<S, R>, mut input: B, out: &mut W) -> Result<()>
where
    S: Store,
    R: OutcomeSource,
    B: BufRead,
    W: Write,
{
    writeln!(out, "Type /help for commands.")?;
    render_poll(round, out)?;
    let mut line = String::new();
    loop {
        write!(out, "> ")?;
        out.flush()?;
        line.clear();
        if input.read_line(&mut line)? == 0 {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }
        let action = match handle_line(&line, round.poll()) {
            Ok(action) => action,
            Err(err) => {
                writeln!(out, "{err}")?;
                continue;
            }
        };
        debug!(?action, "command");
        match dispatch(round, action, &mut input, out) {
            Ok(true) => {}
            Ok(false) => break,
            Err(RoundError::Rejected(err)) => writeln!(out, "{err}")?,
            Err(RoundError::Store(err)) => return Err(err),
        }
    }
    Ok(())
}

/// Apply one action. Returns `false` when the session should end.
fn dispatch<S, R, B, W>(
    round: &mut RoundController<S, R>,
    action: CommandAction,
    input: &mut B,
    out: &mut W,
) -> Result<bool, RoundError>
where
    S: Store,
    R: OutcomeSource,
    B: BufRead,
    W: Write,
{
    match action {
        CommandAction::Quit => return Ok(false),
        CommandAction::Local(text) => {
            if !text.is_empty() {
                emit(out, text)?;
            }
        }
        CommandAction::Bet(slip) => {
            let receipt = round.submit(&slip)?;
            emit(out, receipt)?;
            render_odds(round, out)?;
        }
        CommandAction::Reveal => {
            let reveal = round.reveal_winner()?;
            emit(out, reveal)?;
            render_balance(round, out)?;
        }
        CommandAction::ResetRound => {
            round.reset_round()?;
            emit(out, "Round reset. Betting is open.")?;
        }
        CommandAction::NewGame => {
            if confirm(input, out, "Reset all tokens and player stats? [y/N] ")? {
                round.reset_game()?;
                emit(out, "New game started.")?;
                render_balance(round, out)?;
            } else {
                emit(out, "Cancelled.")?;
            }
        }
        CommandAction::Navigate(direction) => {
            round.advance_poll(direction)?;
            render_poll(round, out)?;
        }
        CommandAction::ShowPoll => render_poll(round, out)?,
        CommandAction::Balance => render_balance(round, out)?,
        CommandAction::Odds => render_odds(round, out)?,
        CommandAction::History => {
            if round.ledger().is_empty() {
                emit(out, "No bets yet.")?;
            }
            for bet in round.history() {
                emit(out, bet)?;
            }
        }
        CommandAction::Leaderboard => {
            let entries = round.leaderboard();
            if entries.is_empty() {
                emit(out, "No winnings yet.")?;
            }
            for entry in entries {
                emit(out, entry)?;
            }
        }
        CommandAction::Status => {
            let phase = match round.phase() {
                Phase::Open => "open",
                Phase::Closed => "closed",
            };
            emit(
                out,
                format!(
                    "Poll {}/{} | betting {phase} | {} bets | pool {} tokens",
                    round.poll_index() + 1,
                    round.catalog().len(),
                    round.ledger().len(),
                    round.ledger().staked()
                ),
            )?;
            if let Some(reveal) = round.announcement() {
                emit(out, reveal)?;
            }
        }
    }
    Ok(true)
}

fn emit<W: Write>(out: &mut W, text: impl Display) -> Result<()> {
    writeln!(out, "{text}")?;
    Ok(())
}

fn confirm<B: BufRead, W: Write>(input: &mut B, out: &mut W, prompt: &str) -> Result<bool> {
    write!(out, "{prompt}")?;
    out.flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

fn render_poll<S: Store, R: OutcomeSource, W: Write>(
    round: &RoundController<S, R>,
    out: &mut W,
) -> Result<()> {
    let poll = round.poll();
    writeln!(out, "{}", poll.question)?;
    for (idx, option) in poll.options.iter().enumerate() {
        writeln!(out, "  #{} {option}", idx + 1)?;
    }
    Ok(())
}

fn render_balance<S: Store, R: OutcomeSource, W: Write>(
    round: &RoundController<S, R>,
    out: &mut W,
) -> Result<()> {
    writeln!(out, "Tokens: {}", round.balance())?;
    Ok(())
}

fn render_odds<S: Store, R: OutcomeSource, W: Write>(
    round: &RoundController<S, R>,
    out: &mut W,
) -> Result<()> {
    let lines = round.distribution();
    if lines.is_empty() {
        writeln!(out, "No bets yet.")?;
    }
    for line in lines {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

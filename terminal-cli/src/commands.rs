use std::collections::BTreeMap;

use anyhow::{anyhow, Result};
use lazy_static::lazy_static;
use pollbet_types::{BetSlip, Direction, Poll};

#[derive(Clone)]
pub struct CommandDef {
    name: &'static str,
    usage: &'static str,
    desc: &'static str,
    group: &'static str,
}

const fn cmd(
    name: &'static str,
    usage: &'static str,
    desc: &'static str,
    group: &'static str,
) -> CommandDef {
    CommandDef {
        name,
        usage,
        desc,
        group,
    }
}

lazy_static! {
    pub static ref COMMANDS: Vec<CommandDef> = vec![
        // Session
        cmd("help", "/help", "Show this palette", "Session"),
        cmd("quit", "/quit", "Exit", "Session"),
        // Round
        cmd("bet", "/bet <player> <option|#n> <amount>", "Place a bet", "Round"),
        cmd("reveal", "/reveal", "Reveal the winner and pay out", "Round"),
        cmd("reset", "/reset", "Clear bets and reopen betting", "Round"),
        cmd("newgame", "/newgame", "Reset tokens and leaderboard", "Round"),
        // Polls
        cmd("poll", "/poll", "Show the current poll", "Polls"),
        cmd("next", "/next", "Switch to the next poll", "Polls"),
        cmd("prev", "/prev", "Switch to the previous poll", "Polls"),
        // Views
        cmd("balance", "/balance", "Show token balance", "Views"),
        cmd("odds", "/odds", "Show pool distribution and odds", "Views"),
        cmd("history", "/history", "Show bets, newest first", "Views"),
        cmd("leaderboard", "/leaderboard", "Show winnings per player", "Views"),
        cmd("status", "/status", "Show round status", "Views"),
    ];
}

#[derive(Debug, PartialEq, Eq)]
pub enum CommandAction {
    Bet(BetSlip),
    Reveal,
    ResetRound,
    NewGame,
    Navigate(Direction),
    ShowPoll,
    Balance,
    Odds,
    History,
    Leaderboard,
    Status,
    Local(String),
    Quit,
}

/// Parse one input line. `poll` resolves `#n` option shortcuts.
pub fn handle_line(line: &str, poll: &Poll) -> Result<CommandAction> {
    let line = line.trim();
    let Some(body) = line.strip_prefix('/') else {
        return Err(anyhow!("Commands start with '/'"));
    };
    let mut parts = split_args(body)?;
    if parts.is_empty() {
        return Ok(CommandAction::Local(String::new()));
    }
    let cmd = expand(parts.remove(0).to_lowercase());
    match cmd.as_str() {
        "quit" | "exit" => Ok(CommandAction::Quit),
        "help" => Ok(CommandAction::Local(render_help())),
        "bet" | "b" => Ok(CommandAction::Bet(handle_bet(parts, poll))),
        "reveal" => Ok(CommandAction::Reveal),
        "reset" => Ok(CommandAction::ResetRound),
        "newgame" => Ok(CommandAction::NewGame),
        "poll" => Ok(CommandAction::ShowPoll),
        "next" => Ok(CommandAction::Navigate(Direction::Next)),
        "prev" | "previous" => Ok(CommandAction::Navigate(Direction::Previous)),
        "balance" | "tokens" => Ok(CommandAction::Balance),
        "odds" => Ok(CommandAction::Odds),
        "history" => Ok(CommandAction::History),
        "leaderboard" | "top" => Ok(CommandAction::Leaderboard),
        "status" => Ok(CommandAction::Status),
        _ => Err(anyhow!("Unknown command /{cmd}")),
    }
}

/// Expand an unambiguous prefix to the full command name. Anything else is returned as is.
fn expand(cmd: String) -> String {
    let mut matches = COMMANDS.iter().filter(|c| c.name.starts_with(cmd.as_str()));
    match (matches.next(), matches.next()) {
        (Some(only), None) => only.name.to_string(),
        _ => cmd,
    }
}

/// Missing pieces stay empty so the controller reports which one is absent.
fn handle_bet(args: Vec<String>, poll: &Poll) -> BetSlip {
    let mut args = args.into_iter();
    let player = args.next().unwrap_or_default();
    let option = args.next().map(|option| resolve_option(option, poll));
    let amount = args.next().unwrap_or_default();
    BetSlip {
        player,
        option,
        amount,
    }
}

/// `#n` picks the n-th option (1-based); anything else is taken literally.
fn resolve_option(token: String, poll: &Poll) -> String {
    token
        .strip_prefix('#')
        .and_then(|n| n.parse::<usize>().ok())
        .and_then(|n| n.checked_sub(1))
        .and_then(|idx| poll.option(idx))
        .map(str::to_string)
        .unwrap_or(token)
}

/// Split on whitespace, keeping double-quoted runs together.
fn split_args(body: &str) -> Result<Vec<String>> {
    let mut out = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quoted = false;
    for c in body.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                in_token = true;
            }
            c if c.is_whitespace() && !quoted => {
                if in_token {
                    out.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            c => {
                current.push(c);
                in_token = true;
            }
        }
    }
    if quoted {
        return Err(anyhow!("Unclosed quote"));
    }
    if in_token {
        out.push(current);
    }
    Ok(out)
}

pub fn render_help() -> String {
    let mut by_group: BTreeMap<&str, Vec<&CommandDef>> = BTreeMap::new();
    for c in COMMANDS.iter() {
        by_group.entry(c.group).or_default().push(c);
    }
    let mut out = String::new();
    for (group, cmds) in by_group {
        out.push_str(&format!("\n[{group}]\n"));
        for c in cmds {
            out.push_str(&format!("  {:<38} {}\n", c.usage, c.desc));
        }
    }
    out
}

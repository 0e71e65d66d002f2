use std::{fmt, process::Command, time::Duration};

use color_eyre::{eyre::eyre, Result};
use reqwest::Url;
use serde_json::Value;
use starter_snake::{config::Config, server::SERVER_ID};

enum GameMode {
    Solo,
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Solo => f.write_str("solo"),
        }
    }
}

struct PlayOptions {
    board_width:  u64,
    board_height: u64,
    mode:         GameMode,
}

struct Snake {
    name: String,
    url:  Url,
}

/// Asks the local snake for its info to make sure it is up before starting a
/// game against it.
fn probe(url: &Url) -> Result<Snake> {
    let resp = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(2))
        .build()?
        .get(url.clone())
        .send()
        .map_err(|e| eyre!("snake at {url} is not answering, is it running? ({e})"))?
        .error_for_status()?;

    let server = resp
        .headers()
        .get("server")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_owned();
    if server != SERVER_ID {
        return Err(eyre!(
            "{url} identified itself as {server:?}, not {SERVER_ID:?}"
        ));
    }

    let info: Value = serde_json::from_str(&resp.text()?)?;
    let name = info["author"]
        .as_str()
        .ok_or_else(|| eyre!("info response from {url} has no author"))?;

    Ok(Snake {
        name: name.to_owned(),
        url:  url.clone(),
    })
}

fn make_play_command(play_options: &PlayOptions, snakes: &[Snake]) -> Command {
    let mut cmd = Command::new("battlesnake");
    cmd.arg("play");

    cmd.arg("--width");
    cmd.arg(play_options.board_width.to_string());
    cmd.arg("--height");
    cmd.arg(play_options.board_height.to_string());

    for snake in snakes {
        cmd.arg("--name");
        cmd.arg(&snake.name);

        cmd.arg("--url");
        cmd.arg(snake.url.to_string());
    }

    cmd.arg("--gametype");
    cmd.arg(play_options.mode.to_string());

    cmd.arg("--browser");

    cmd
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let config = Config::from_env();
    let url: Url = format!("http://localhost:{}", config.port).parse()?;

    let snakes = [probe(&url)?];

    let mut play = make_play_command(
        &PlayOptions {
            board_width:  11,
            board_height: 11,
            mode:         GameMode::Solo,
        },
        &snakes,
    );

    let status = play.status()?;
    if !status.success() {
        return Err(eyre!("battlesnake play exited with {status}"));
    }

    Ok(())
}

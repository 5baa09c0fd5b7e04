//! Honeyword entry point
//!
//! The browser build is driven through the `web` bindings of the library.
//! Natively this runs an idle auto-play demo and logs the result.

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use honeyword::highscores::HighScoreEntry;
    use honeyword::persistence::MemoryStore;
    use honeyword::platform;
    use honeyword::HighScores;
    use honeyword::sim::{Dictionary, GameConfig, GameState, MIN_WORD_LEN, Variant, find_word};

    /// Turns before the demo gives up on a game that will not end
    const MAX_TURNS: u32 = 500;

    /// Play one word found on the board. Returns false when none is playable.
    fn play_word(state: &mut GameState, dict: &Dictionary) -> bool {
        let Some(found) = find_word(&state.grid, dict, MIN_WORD_LEN, &state.locked_tiles) else {
            return false;
        };
        let used = state.words_played.contains(&found.word)
            || state.words_this_round.contains(&found.word);
        if used {
            return false;
        }
        for &id in &found.cells {
            match state.select_tile(id) {
                Ok(Some(request)) => {
                    let verdict = Ok(dict.contains(&request.word));
                    state.apply_validation(&request, verdict);
                }
                Ok(None) => {}
                Err(e) => {
                    log::debug!("Demo could not select {id}: {e}");
                    return false;
                }
            }
        }
        match state.submit_word() {
            Ok(_) => true,
            Err(e) => {
                log::debug!("Demo could not submit {}: {e}", found.word);
                false
            }
        }
    }

    pub fn run(variant: Variant, seed: u64) {
        let dict = match Dictionary::bundled() {
            Ok(dict) => dict,
            Err(e) => {
                log::error!("Dictionary unavailable: {e}");
                return;
            }
        };
        let mut state = GameState::new(GameConfig::new(variant, seed));

        let mut turns = 0;
        while turns < MAX_TURNS && !state.is_game_over() {
            state.run_to_player(&dict);
            if state.is_game_over() {
                break;
            }
            if !play_word(&mut state, &dict) {
                if let Err(e) = state.end_turn() {
                    log::warn!("Demo stalled: {e}");
                    break;
                }
                turns += 1;
            }
        }

        log::info!(
            "Demo finished: {} round {}, score {}, {} words, longest {:?}",
            variant.as_str(),
            state.round,
            state.score,
            state.total_words,
            state.longest_word
        );
        let auto: Vec<&str> = state.auto_cleared_words().collect();
        if !auto.is_empty() {
            log::info!("Auto-cleared: {}", auto.join(", "));
        }

        let store = MemoryStore::new();
        let mut scores = HighScores::load(&store);
        match scores.add(HighScoreEntry::from_state(&state, platform::now_ms())) {
            Some(rank) => log::info!("Local high score rank #{rank}"),
            None => log::info!("No local high score"),
        }
        if let Err(e) = scores.save(&store) {
            log::warn!("Could not save high scores: {e}");
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Honeyword (native) starting...");

    let mut args = std::env::args().skip(1);
    let variant = args
        .next()
        .and_then(|s| honeyword::Variant::parse(&s))
        .unwrap_or_default();
    let seed = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| honeyword::platform::now_ms() as u64);
    log::info!("Idle demo: variant={} seed={seed}", variant.as_str());

    demo::run(variant, seed);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is `web::start`; this only satisfies the bin target
}

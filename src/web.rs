//! Browser bindings
//!
//! Exposes the game to the host page through `wasm-bindgen`. State crosses
//! the boundary as JSON strings; rejected actions come back as error
//! strings for the page to show as a notice.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;

use crate::persistence::{self, LocalStore};
use crate::platform;
use crate::sim::{
    ActionError, Dictionary, GameConfig, GameState, PhaseTicket, Variant, WordValidator,
};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"logger already initialized".into());
    }
    log::info!("Honeyword starting...");
}

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn parse_variant(name: &str) -> Result<Variant, JsValue> {
    Variant::parse(name).ok_or_else(|| js_err(format!("unknown variant {name}")))
}

struct Inner {
    state: GameState,
    dictionary: Rc<Dictionary>,
}

/// One game instance owned by the page
#[wasm_bindgen]
pub struct WasmGame {
    inner: Rc<RefCell<Inner>>,
}

impl WasmGame {
    fn from_state(state: GameState) -> Result<WasmGame, JsValue> {
        let dictionary = Rc::new(Dictionary::bundled().map_err(js_err)?);
        Ok(Self {
            inner: Rc::new(RefCell::new(Inner { state, dictionary })),
        })
    }

    fn act<T>(
        &self,
        f: impl FnOnce(&mut GameState) -> Result<T, ActionError>,
    ) -> Result<T, JsValue> {
        let mut inner = self.inner.borrow_mut();
        f(&mut inner.state).map_err(|e| {
            log::debug!("Rejected: {e}");
            js_err(e)
        })
    }
}

#[wasm_bindgen]
impl WasmGame {
    /// New game; `seed` of 0 picks one from the clock
    #[wasm_bindgen(constructor)]
    pub fn new(variant: &str, seed: f64) -> Result<WasmGame, JsValue> {
        let seed = if seed > 0.0 {
            seed as u64
        } else {
            platform::now_ms() as u64
        };
        Self::from_state(GameState::new(GameConfig::new(parse_variant(variant)?, seed)))
    }

    /// Today's shared board
    pub fn daily(variant: &str) -> Result<WasmGame, JsValue> {
        let seed = crate::daily_seed(&platform::today());
        Self::from_state(GameState::new(GameConfig::new(parse_variant(variant)?, seed)))
    }

    /// Saved game for `variant`, if one exists
    pub fn resume(variant: &str) -> Result<Option<WasmGame>, JsValue> {
        let store = LocalStore::open().map_err(js_err)?;
        match persistence::load_game(&store, parse_variant(variant)?).map_err(js_err)? {
            Some(state) => {
                log::info!("Resuming game (round {})", state.round);
                Self::from_state(state).map(Some)
            }
            None => Ok(None),
        }
    }

    pub fn save(&self) -> Result<(), JsValue> {
        let store = LocalStore::open().map_err(js_err)?;
        persistence::save_game(&store, &self.inner.borrow().state).map_err(js_err)
    }

    /// Returns whether the new word should be validated
    pub fn select_tile(&self, cell_id: u32) -> Result<bool, JsValue> {
        self.act(|s| s.select_tile(cell_id)).map(|req| req.is_some())
    }

    /// Validate the current word; resolves to its validity
    pub fn validate(&self) -> js_sys::Promise {
        let inner = Rc::clone(&self.inner);
        wasm_bindgen_futures::future_to_promise(async move {
            let (request, dictionary) = {
                let g = inner.borrow();
                (g.state.validation_request(), Rc::clone(&g.dictionary))
            };
            let Some(request) = request else {
                return Ok(JsValue::FALSE);
            };
            let verdict = dictionary.validate(&request.word).await;
            let mut g = inner.borrow_mut();
            g.state.apply_validation(&request, verdict);
            Ok(JsValue::from_bool(g.state.selection.is_word_valid()))
        })
    }

    /// Returns the points scored
    pub fn submit_word(&self) -> Result<f64, JsValue> {
        self.act(|s| s.submit_word()).map(|b| b.points as f64)
    }

    pub fn end_turn(&self) -> Result<(), JsValue> {
        self.act(|s| s.end_turn())
    }

    pub fn orbit(&self, pivot: u32, steps: i32, anchor: Option<u32>) -> Result<(), JsValue> {
        self.act(|s| s.orbit(pivot, steps, anchor))
    }

    pub fn piston(&self, target: u32) -> Result<(), JsValue> {
        self.act(|s| s.piston(target))
    }

    /// Returns whether the tile is now locked
    pub fn toggle_lock(&self, cell_id: u32) -> Result<bool, JsValue> {
        self.act(|s| s.toggle_lock(cell_id))
    }

    pub fn undo(&self) -> Result<(), JsValue> {
        self.act(|s| s.undo_last_action())
    }

    pub fn reset(&self) {
        self.inner.borrow_mut().state.reset_game();
        if let Ok(store) = LocalStore::open() {
            let variant = self.inner.borrow().state.config.variant;
            if let Err(e) = persistence::clear_game(&store, variant) {
                log::warn!("Could not clear save: {e}");
            }
        }
    }

    /// Finish the transient phase named by a ticket from `snapshot_json`.
    /// Stale tickets are ignored and return false.
    pub fn advance(&self, generation: u32, step: f64) -> bool {
        let mut g = self.inner.borrow_mut();
        let dictionary = Rc::clone(&g.dictionary);
        let ticket = PhaseTicket {
            generation,
            step: step as u64,
        };
        g.state.advance_phase(ticket, &dictionary)
    }

    pub fn snapshot_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.inner.borrow().state.snapshot()).map_err(js_err)
    }

    pub fn is_game_over(&self) -> bool {
        self.inner.borrow().state.is_game_over()
    }
}

use std::fmt;

use tracing::{debug, info};

use crate::color::Rgb;
use crate::params::FractalParameters;
use crate::query::{self, ShareQuery};

/// Everything the UI layer reads from the store: the parameters plus the
/// introduction flag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApplicationUiState {
    pub params: FractalParameters,
    pub show_introduction: bool,
}

impl Default for ApplicationUiState {
    fn default() -> Self {
        Self {
            params: FractalParameters::default(),
            show_introduction: true,
        }
    }
}

/// Handle returned by [`ParameterStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Observer = Box<dyn FnMut(&ApplicationUiState) + Send>;

/// Single source of truth for the tree parameters and the introduction flag.
///
/// Every mutation bumps [`revision`](Self::revision) and synchronously calls
/// each subscriber with the new state, in subscription order. Callers that
/// prefer polling can compare revisions instead of subscribing.
///
/// The store is not internally synchronized: it is owned by one thread (the
/// UI thread) and renderers receive `Copy` snapshots.
pub struct ParameterStore {
    state: ApplicationUiState,
    revision: u64,
    next_subscription: u64,
    observers: Vec<(SubscriptionId, Observer)>,
}

impl ParameterStore {
    pub fn new() -> Self {
        Self::with_state(ApplicationUiState::default())
    }

    pub fn with_state(state: ApplicationUiState) -> Self {
        Self {
            state,
            revision: 0,
            next_subscription: 0,
            observers: Vec::new(),
        }
    }

    // -- Reads -------------------------------------------------------------

    #[inline]
    pub fn params(&self) -> FractalParameters {
        self.state.params
    }

    #[inline]
    pub fn state(&self) -> ApplicationUiState {
        self.state
    }

    #[inline]
    pub fn show_introduction(&self) -> bool {
        self.state.show_introduction
    }

    /// Monotonic counter, incremented on every notifying mutation.
    #[inline]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    // -- Observers ---------------------------------------------------------

    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut(&ApplicationUiState) + Send + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Remove a subscriber. Returns `false` if `id` was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sid, _)| *sid != id);
        self.observers.len() != before
    }

    fn notify(&mut self) {
        self.revision += 1;
        let state = self.state;
        for (_, observer) in &mut self.observers {
            observer(&state);
        }
    }

    // -- Setters -----------------------------------------------------------
    //
    // Setters trust their callers (range-limited sliders and pickers) and do
    // not re-validate.

    pub fn set_branch_angle(&mut self, degrees: f64) {
        self.state.params.branch_angle_degrees = degrees;
        self.notify();
    }

    pub fn set_scale_factor(&mut self, factor: f64) {
        self.state.params.scale_factor = factor;
        self.notify();
    }

    pub fn set_depth(&mut self, depth: u32) {
        self.state.params.depth = depth;
        self.notify();
    }

    pub fn set_color_start(&mut self, color: Rgb) {
        self.state.params.color_start = color;
        self.notify();
    }

    pub fn set_color_end(&mut self, color: Rgb) {
        self.state.params.color_end = color;
        self.notify();
    }

    /// Restore every parameter to its default. The introduction flag is kept.
    pub fn reset_params(&mut self) {
        self.state.params = FractalParameters::default();
        self.notify();
    }

    pub fn dismiss_introduction(&mut self) {
        if self.state.show_introduction {
            self.state.show_introduction = false;
            self.notify();
        }
    }

    // -- Share links -------------------------------------------------------

    /// Merge recognised keys from a decoded query into the current state.
    ///
    /// Each of `a`, `s`, `d`, `c`, `c2` is applied independently if it parses
    /// and lies within range; anything else is ignored. If at least one field
    /// was applied the introduction is dismissed and subscribers are notified
    /// once. Returns the number of fields applied.
    pub fn load_from_query<I, K, V>(&mut self, query: I) -> usize
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut next = self.state.params;
        let mut applied = 0;

        for (key, value) in query {
            let (key, value) = (key.as_ref(), value.as_ref());
            let accepted = match key {
                query::KEY_ANGLE => query::decode_angle(value)
                    .map(|v| next.branch_angle_degrees = v)
                    .is_some(),
                query::KEY_SCALE => query::decode_scale(value)
                    .map(|v| next.scale_factor = v)
                    .is_some(),
                query::KEY_DEPTH => query::decode_depth(value)
                    .map(|v| next.depth = v)
                    .is_some(),
                query::KEY_COLOR_START => query::decode_color(value)
                    .map(|c| next.color_start = c)
                    .is_some(),
                query::KEY_COLOR_END => query::decode_color(value)
                    .map(|c| next.color_end = c)
                    .is_some(),
                _ => continue,
            };
            if accepted {
                applied += 1;
            } else {
                debug!(key, value, "Ignoring invalid share-link value");
            }
        }

        if applied > 0 {
            self.state.params = next;
            self.state.show_introduction = false;
            info!(applied, "Loaded parameters from share link");
            self.notify();
        }
        applied
    }

    /// The canonical share encoding of the current parameters.
    pub fn to_share_query(&self) -> ShareQuery {
        ShareQuery::from_params(&self.state.params)
    }

    /// `base` with its query replaced by the current share query.
    pub fn share_url(&self, base: &str) -> String {
        self.to_share_query().to_url(base)
    }
}

impl Default for ParameterStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ParameterStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParameterStore")
            .field("state", &self.state)
            .field("revision", &self.revision)
            .field("observers", &self.observers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::query::parse_query;

    fn query(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn new_store_has_defaults_and_intro() {
        let store = ParameterStore::new();
        assert_eq!(store.params(), FractalParameters::default());
        assert!(store.show_introduction());
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn setters_overwrite_and_notify() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut store = ParameterStore::new();
        let sink = Arc::clone(&seen);
        store.subscribe(move |s| sink.lock().unwrap().push(s.params.depth));

        store.set_depth(12);
        store.set_branch_angle(40.5);
        store.set_scale_factor(0.55);
        store.set_color_start(Rgb::new(1, 2, 3));
        store.set_color_end(Rgb::new(4, 5, 6));

        let p = store.params();
        assert_eq!(p.depth, 12);
        assert_eq!(p.branch_angle_degrees, 40.5);
        assert_eq!(p.scale_factor, 0.55);
        assert_eq!(p.color_start, Rgb::new(1, 2, 3));
        assert_eq!(p.color_end, Rgb::new(4, 5, 6));
        assert_eq!(seen.lock().unwrap().len(), 5);
        assert_eq!(seen.lock().unwrap()[0], 12);
        assert_eq!(store.revision(), 5);
        // Editing parameters directly does not touch the introduction flag.
        assert!(store.show_introduction());
    }

    #[test]
    fn unsubscribe_stops_notifications() {
        let count = Arc::new(Mutex::new(0));
        let mut store = ParameterStore::new();
        let c = Arc::clone(&count);
        let id = store.subscribe(move |_| *c.lock().unwrap() += 1);
        store.set_depth(6);
        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        store.set_depth(7);
        assert_eq!(*count.lock().unwrap(), 1);
    }

    #[test]
    fn dismiss_introduction_is_idempotent() {
        let mut store = ParameterStore::new();
        store.dismiss_introduction();
        assert!(!store.show_introduction());
        let rev = store.revision();
        store.dismiss_introduction();
        assert_eq!(store.revision(), rev, "second dismiss must be a no-op");
    }

    #[test]
    fn out_of_range_angle_is_rejected() {
        let mut store = ParameterStore::new();
        assert_eq!(store.load_from_query(query(&[("a", "999")])), 0);
        assert_eq!(store.params().branch_angle_degrees, 25.0);
        assert!(store.show_introduction());
    }

    #[test]
    fn invalid_color_is_rejected() {
        let mut store = ParameterStore::new();
        store.load_from_query(query(&[("c", "zzzzzz")]));
        assert_eq!(store.params().color_start, Rgb::new(0x39, 0xFF, 0x14));
    }

    #[test]
    fn partial_load_dismisses_introduction() {
        let mut store = ParameterStore::new();
        assert_eq!(store.load_from_query(query(&[("d", "7")])), 1);
        assert_eq!(store.params().depth, 7);
        assert!(!store.show_introduction());
        assert_eq!(store.params().branch_angle_degrees, 25.0);
    }

    #[test]
    fn empty_or_unrecognised_query_leaves_state_untouched() {
        let mut store = ParameterStore::new();
        store.load_from_query(Vec::<(String, String)>::new());
        store.load_from_query(query(&[("zoom", "3"), ("theme", "dark")]));
        assert!(store.show_introduction());
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn mixed_query_applies_only_valid_fields() {
        let mut store = ParameterStore::new();
        let applied = store.load_from_query(parse_query("a=45&s=2.0&d=abc&c=ABCDEF&c2=12345"));
        assert_eq!(applied, 2);
        let p = store.params();
        assert_eq!(p.branch_angle_degrees, 45.0);
        assert_eq!(p.scale_factor, 0.7);
        assert_eq!(p.depth, 10);
        assert_eq!(p.color_start, Rgb::new(0xAB, 0xCD, 0xEF));
        assert_eq!(p.color_end, Rgb::new(0xFF, 0x45, 0x00));
    }

    #[test]
    fn repeated_keys_use_their_first_value() {
        let mut store = ParameterStore::new();
        store.load_from_query(parse_query("?d=7&d=12"));
        assert_eq!(store.params().depth, 7);

        let mut store = ParameterStore::new();
        let applied = store.load_from_query(parse_query("?a=30&a=999"));
        assert_eq!(applied, 1);
        assert_eq!(store.params().branch_angle_degrees, 30.0);
    }

    #[test]
    fn load_notifies_once() {
        let count = Arc::new(Mutex::new(0));
        let mut store = ParameterStore::new();
        let c = Arc::clone(&count);
        store.subscribe(move |_| *c.lock().unwrap() += 1);
        store.load_from_query(parse_query("a=30&s=0.6&d=8"));
        assert_eq!(*count.lock().unwrap(), 1);
    }

    #[test]
    fn share_query_roundtrips_through_load() {
        let mut source = ParameterStore::new();
        source.set_branch_angle(37.5);
        source.set_scale_factor(0.83);
        source.set_depth(13);
        source.set_color_start(Rgb::new(0x12, 0xab, 0xef));
        source.set_color_end(Rgb::new(0, 0, 0));

        let mut target = ParameterStore::new();
        target.load_from_query(&source.to_share_query());
        assert_eq!(target.params(), source.params());
    }

    #[test]
    fn share_url_uses_canonical_query() {
        let store = ParameterStore::new();
        assert_eq!(
            store.share_url("https://lab.example/"),
            "https://lab.example/?a=25.0&s=0.70&d=10&c=39FF14&c2=FF4500"
        );
    }

    #[test]
    fn reset_restores_defaults_but_keeps_intro_state() {
        let mut store = ParameterStore::new();
        store.dismiss_introduction();
        store.set_depth(15);
        store.reset_params();
        assert_eq!(store.params(), FractalParameters::default());
        assert!(!store.show_introduction());
    }
}

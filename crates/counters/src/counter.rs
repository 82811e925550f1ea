//! Runtime counter instances.

use std::sync::Arc;

use gamekit_prefs::PreferenceStore;

use crate::config::{CounterConfiguration, CounterKind};

/// The numeric value of a counter, matching its configured kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CounterValue {
    Int(i32),
    Float(f32),
}

/// Value change reported to a counter callback.
#[derive(Debug, Clone, PartialEq)]
pub struct CounterChange {
    pub name: String,
    pub old: CounterValue,
    pub new: CounterValue,
}

type ChangeCallback = Box<dyn FnMut(&CounterChange)>;

/// A named, bounded, optionally-persisted numeric value with a tracked
/// high-water mark.
///
/// The counter binds one [`CounterConfiguration`] plus a `prefs_prefix`
/// namespacing its preference keys and an optional `identifier` for callers
/// managing several instances of the same configuration (the identifier is
/// not part of the key; fold it into the prefix when instances must not
/// share storage).
///
/// Amounts are always clamped to the configured bounds; the best value only
/// ever increases and is clamped to the bounds when observed through its
/// getter, not when stored. The `*_saved` mirrors track the last values
/// handed to [`push_to_saved`] and are not updated by anything else.
///
/// # Preference keys
///
/// Key layout is a compatibility contract and must not change:
/// `"{prefix}CI.{name}"` / `"{prefix}CIH.{name}"` for int amount and best,
/// `"{prefix}CF.{name}"` / `"{prefix}CFH.{name}"` for float amount and best.
///
/// [`push_to_saved`]: Counter::push_to_saved
pub struct Counter {
    configuration: Arc<CounterConfiguration>,
    prefs_prefix: String,
    identifier: Option<i32>,

    int_amount: i32,
    int_amount_best: i32,
    int_amount_saved: i32,
    int_amount_best_saved: i32,

    float_amount: f32,
    float_amount_best: f32,
    float_amount_saved: f32,
    float_amount_best_saved: f32,

    on_changed: Option<ChangeCallback>,
    on_best_changed: Option<ChangeCallback>,
}

impl Counter {
    /// Create a counter bound to a configuration.
    ///
    /// Amount and best start at the configured default; the saved mirrors
    /// start at zero, meaning "nothing persisted yet".
    pub fn new(
        configuration: Arc<CounterConfiguration>,
        prefs_prefix: impl Into<String>,
        identifier: Option<i32>,
    ) -> Self {
        Self {
            int_amount: configuration.int_default,
            int_amount_best: configuration.int_default,
            int_amount_saved: 0,
            int_amount_best_saved: 0,
            float_amount: configuration.float_default,
            float_amount_best: configuration.float_default,
            float_amount_saved: 0.0,
            float_amount_best_saved: 0.0,
            configuration,
            prefs_prefix: prefs_prefix.into(),
            identifier,
            on_changed: None,
            on_best_changed: None,
        }
    }

    pub fn configuration(&self) -> &CounterConfiguration {
        &self.configuration
    }

    pub fn name(&self) -> &str {
        &self.configuration.name
    }

    pub fn identifier(&self) -> Option<i32> {
        self.identifier
    }

    /// Register the callback fired when the amount changes.
    pub fn set_on_changed(&mut self, callback: impl FnMut(&CounterChange) + 'static) {
        self.on_changed = Some(Box::new(callback));
    }

    /// Register the callback fired when the best value increases.
    pub fn set_on_best_changed(&mut self, callback: impl FnMut(&CounterChange) + 'static) {
        self.on_best_changed = Some(Box::new(callback));
    }

    pub fn int_amount(&self) -> i32 {
        self.int_amount
    }

    /// Best int value so far, clamped to the configured bounds at
    /// observation time.
    pub fn int_amount_best(&self) -> i32 {
        clamp_int(
            self.int_amount_best,
            self.configuration.int_minimum,
            self.configuration.int_maximum,
        )
    }

    pub fn int_amount_saved(&self) -> i32 {
        self.int_amount_saved
    }

    pub fn int_amount_best_saved(&self) -> i32 {
        self.int_amount_best_saved
    }

    pub fn float_amount(&self) -> f32 {
        self.float_amount
    }

    /// Best float value so far, clamped to the configured bounds at
    /// observation time.
    pub fn float_amount_best(&self) -> f32 {
        clamp_float(
            self.float_amount_best,
            self.configuration.float_minimum,
            self.configuration.float_maximum,
        )
    }

    pub fn float_amount_saved(&self) -> f32 {
        self.float_amount_saved
    }

    pub fn float_amount_best_saved(&self) -> f32 {
        self.float_amount_best_saved
    }

    /// Set the int amount, clamping to the configured bounds.
    ///
    /// Fires the changed callback (once) if the clamped value differs from
    /// the current amount, and independently the best-changed callback
    /// (once) if it exceeds the current best. Out-of-bounds input is never
    /// an error.
    pub fn set_int(&mut self, value: i32) {
        let clamped = clamp_int(
            value,
            self.configuration.int_minimum,
            self.configuration.int_maximum,
        );

        if clamped != self.int_amount {
            let old = self.int_amount;
            self.int_amount = clamped;
            fire(
                &mut self.on_changed,
                &self.configuration.name,
                CounterValue::Int(old),
                CounterValue::Int(clamped),
            );
        }

        if clamped > self.int_amount_best {
            let old_best = self.int_amount_best;
            self.int_amount_best = clamped;
            fire(
                &mut self.on_best_changed,
                &self.configuration.name,
                CounterValue::Int(old_best),
                CounterValue::Int(clamped),
            );
        }
    }

    /// Add to the int amount (saturating) with the same clamp and callback
    /// behaviour as [`set_int`](Counter::set_int).
    pub fn increase_int(&mut self, by: i32) {
        self.set_int(self.int_amount.saturating_add(by));
    }

    pub fn decrease_int(&mut self, by: i32) {
        self.set_int(self.int_amount.saturating_sub(by));
    }

    /// Set the float amount, clamping to the configured bounds. Callback
    /// behaviour mirrors [`set_int`](Counter::set_int).
    pub fn set_float(&mut self, value: f32) {
        let clamped = clamp_float(
            value,
            self.configuration.float_minimum,
            self.configuration.float_maximum,
        );

        if clamped != self.float_amount {
            let old = self.float_amount;
            self.float_amount = clamped;
            fire(
                &mut self.on_changed,
                &self.configuration.name,
                CounterValue::Float(old),
                CounterValue::Float(clamped),
            );
        }

        if clamped > self.float_amount_best {
            let old_best = self.float_amount_best;
            self.float_amount_best = clamped;
            fire(
                &mut self.on_best_changed,
                &self.configuration.name,
                CounterValue::Float(old_best),
                CounterValue::Float(clamped),
            );
        }
    }

    pub fn increase_float(&mut self, by: f32) {
        self.set_float(self.float_amount + by);
    }

    pub fn decrease_float(&mut self, by: f32) {
        self.set_float(self.float_amount - by);
    }

    /// Set the amount back to the configured default. The best value is
    /// untouched; change callbacks fire as for any other set.
    pub fn reset(&mut self) {
        match self.configuration.kind {
            CounterKind::Int => self.set_int(self.configuration.int_default),
            CounterKind::Float => self.set_float(self.configuration.float_default),
        }
    }

    /// Read persisted values from the preference store.
    ///
    /// The amount is read only when `save == Always` and the best value only
    /// when `save_best == Always`; gated fields keep their constructed
    /// defaults even if a stored value exists under their key. Callbacks do
    /// not fire for loaded values.
    pub fn load_from_prefs(&mut self, prefs: &dyn PreferenceStore) {
        match self.configuration.kind {
            CounterKind::Int => {
                if self.configuration.save.is_always()
                    && let Some(value) = prefs.int(&self.int_key())
                {
                    self.int_amount = clamp_int(
                        value,
                        self.configuration.int_minimum,
                        self.configuration.int_maximum,
                    );
                }
                if self.configuration.save_best.is_always()
                    && let Some(value) = prefs.int(&self.int_best_key())
                {
                    self.int_amount_best = value;
                }
            }
            CounterKind::Float => {
                if self.configuration.save.is_always()
                    && let Some(value) = prefs.float(&self.float_key())
                {
                    self.float_amount = clamp_float(
                        value,
                        self.configuration.float_minimum,
                        self.configuration.float_maximum,
                    );
                }
                if self.configuration.save_best.is_always()
                    && let Some(value) = prefs.float(&self.float_best_key())
                {
                    self.float_amount_best = value;
                }
            }
        }
    }

    /// Mirror the current values into the saved fields, per save policy.
    ///
    /// With `save == None` the saved amount stays untouched; with
    /// `save_best == None` the saved best stays untouched.
    pub fn push_to_saved(&mut self) {
        match self.configuration.kind {
            CounterKind::Int => {
                if self.configuration.save.is_always() {
                    self.int_amount_saved = self.int_amount;
                }
                if self.configuration.save_best.is_always() {
                    self.int_amount_best_saved = self.int_amount_best;
                }
            }
            CounterKind::Float => {
                if self.configuration.save.is_always() {
                    self.float_amount_saved = self.float_amount;
                }
                if self.configuration.save_best.is_always() {
                    self.float_amount_best_saved = self.float_amount_best;
                }
            }
        }
    }

    /// Write the amount and best value to the preference store, per save
    /// policy. Fields gated `None` are not written and any pre-existing key
    /// for them is left untouched.
    pub fn write_to_prefs(&self, prefs: &dyn PreferenceStore) -> gamekit_prefs::Result<()> {
        match self.configuration.kind {
            CounterKind::Int => {
                if self.configuration.save.is_always() {
                    prefs.set_int(&self.int_key(), self.int_amount)?;
                }
                if self.configuration.save_best.is_always() {
                    prefs.set_int(&self.int_best_key(), self.int_amount_best)?;
                }
            }
            CounterKind::Float => {
                if self.configuration.save.is_always() {
                    prefs.set_float(&self.float_key(), self.float_amount)?;
                }
                if self.configuration.save_best.is_always() {
                    prefs.set_float(&self.float_best_key(), self.float_amount_best)?;
                }
            }
        }
        tracing::debug!("Wrote counter {:?} to prefs", self.configuration.name);
        Ok(())
    }

    fn int_key(&self) -> String {
        format!("{}CI.{}", self.prefs_prefix, self.configuration.name)
    }

    fn int_best_key(&self) -> String {
        format!("{}CIH.{}", self.prefs_prefix, self.configuration.name)
    }

    fn float_key(&self) -> String {
        format!("{}CF.{}", self.prefs_prefix, self.configuration.name)
    }

    fn float_best_key(&self) -> String {
        format!("{}CFH.{}", self.prefs_prefix, self.configuration.name)
    }
}

/// Clamp that tolerates malformed bounds instead of panicking: with an
/// inverted range the minimum wins. Configuration from data files is
/// validated at load, but a counter must stay total for any bounds it is
/// handed.
fn clamp_int(value: i32, minimum: i32, maximum: i32) -> i32 {
    value.min(maximum).max(minimum)
}

/// Float counterpart of [`clamp_int`]; `f32::min`/`f32::max` also absorb a
/// NaN bound or value, where `f32::clamp` would panic.
fn clamp_float(value: f32, minimum: f32, maximum: f32) -> f32 {
    value.min(maximum).max(minimum)
}

fn fire(callback: &mut Option<ChangeCallback>, name: &str, old: CounterValue, new: CounterValue) {
    if let Some(callback) = callback.as_mut() {
        callback(&CounterChange {
            name: name.to_string(),
            old,
            new,
        });
    }
}

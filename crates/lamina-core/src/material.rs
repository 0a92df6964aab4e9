//! Refractive-index models and shared material handles.
//!
//! All media implement the [`Material`] trait, which returns the complex
//! refractive index $\tilde{n} = n + ik$ at a given frequency. Materials are
//! held through [`Shared`] handles so that mutating a model in place (e.g.
//! retuning a resonance between sweeps) is visible through every layer and
//! stack that references it. The aliasing is intentional: interactive sweep
//! workflows vary a parameter without rebuilding the stack.

use std::fmt;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use num_complex::Complex64;

/// Principal-axis selector for anisotropic media.
///
/// Only isotropic models ship with this crate, but the selector is part of
/// the index-query contract so anisotropic backends can be added without
/// changing callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndexComponent {
    #[default]
    X,
    Y,
    Z,
}

/// Frequency-dependent complex refractive index of a medium.
pub trait Material: Send + Sync {
    /// Human-readable name of this material.
    fn name(&self) -> &str {
        "unnamed"
    }

    /// Complex refractive index at a frequency (Hz).
    fn index(&self, frequency: f64, component: IndexComponent) -> Complex64;

    /// A representative index for queries that carry no frequency.
    ///
    /// Used to bootstrap semi-infinite boundary layers and for sanity checks.
    /// This is a meaningful scalar, not an empty spectrum; the two cases must
    /// never be conflated.
    fn representative_index(&self) -> Complex64;

    /// Evaluate the index over a frequency sweep.
    fn index_spectrum(&self, frequencies: &[f64], component: IndexComponent) -> Vec<Complex64> {
        frequencies
            .iter()
            .map(|&f| self.index(f, component))
            .collect()
    }
}

/// A shared, reference-counted handle with explicit interior mutability.
///
/// Cloning a `Shared` aliases the underlying value. Mutation goes through
/// [`Shared::with_mut`], keeping write access visible at the call site.
pub struct Shared<T: ?Sized>(Arc<RwLock<T>>);

impl<T> Shared<T> {
    pub fn new(value: T) -> Self {
        Self(Arc::new(RwLock::new(value)))
    }
}

impl<T: ?Sized> Shared<T> {
    fn read(&self) -> RwLockReadGuard<'_, T> {
        // A poisoned lock only means a previous writer panicked mid-mutation;
        // the value itself is still a plain material model, so recover it.
        self.0.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, T> {
        self.0.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Run a closure against a shared borrow of the value.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.read())
    }

    /// Run a closure against an exclusive borrow of the value.
    ///
    /// The mutation is observed by every clone of this handle.
    pub fn with_mut<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        f(&mut self.write())
    }
}

impl<T: ?Sized> Clone for Shared<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T: ?Sized> fmt::Debug for Shared<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Shared(..)")
    }
}

/// Type-erased shared material handle, as stored by layers.
pub type MaterialHandle = Shared<dyn Material>;

impl<M: Material + 'static> From<Shared<M>> for MaterialHandle {
    fn from(handle: Shared<M>) -> Self {
        Shared(handle.0)
    }
}

impl MaterialHandle {
    /// Wrap a material model in an erased shared handle.
    ///
    /// Keep a typed [`Shared`] clone around if the model is to be mutated
    /// later; the erased handle only exposes the read-side trait.
    pub fn erased(material: impl Material + 'static) -> Self {
        Shared::new(material).into()
    }

    pub fn name(&self) -> String {
        self.with(|m| m.name().to_owned())
    }

    pub fn index(&self, frequency: f64, component: IndexComponent) -> Complex64 {
        self.with(|m| m.index(frequency, component))
    }

    pub fn representative_index(&self) -> Complex64 {
        self.with(|m| m.representative_index())
    }

    pub fn index_spectrum(&self, frequencies: &[f64], component: IndexComponent) -> Vec<Complex64> {
        self.with(|m| m.index_spectrum(frequencies, component))
    }
}

/// A dispersionless medium with a fixed complex index.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantIndex {
    name: String,
    index: Complex64,
}

impl ConstantIndex {
    /// Lossless medium with a real index.
    pub fn new(name: impl Into<String>, n: f64) -> Self {
        Self::complex(name, Complex64::new(n, 0.0))
    }

    /// Medium with a fixed complex index $n + ik$.
    pub fn complex(name: impl Into<String>, index: Complex64) -> Self {
        Self {
            name: name.into(),
            index,
        }
    }

    /// Vacuum (n = 1).
    pub fn vacuum() -> Self {
        Self::new("vacuum", 1.0)
    }

    /// Replace the stored index in place.
    pub fn set_index(&mut self, index: Complex64) {
        self.index = index;
    }
}

impl Default for ConstantIndex {
    fn default() -> Self {
        Self::vacuum()
    }
}

impl Material for ConstantIndex {
    fn name(&self) -> &str {
        &self.name
    }

    fn index(&self, _frequency: f64, _component: IndexComponent) -> Complex64 {
        self.index
    }

    fn representative_index(&self) -> Complex64 {
        self.index
    }
}

/// A medium defined by an arbitrary index function.
///
/// Adapts any `Fn(frequency, component) -> Complex64` closure into a
/// [`Material`], so a measured or tabulated dispersion curve can back a
/// layer without a dedicated model type. The representative index is
/// supplied explicitly; there is no frequency to evaluate the closure at.
pub struct FnMaterial<F> {
    name: String,
    representative: Complex64,
    index_fn: F,
}

impl<F> FnMaterial<F>
where
    F: Fn(f64, IndexComponent) -> Complex64 + Send + Sync,
{
    pub fn new(name: impl Into<String>, representative: Complex64, index_fn: F) -> Self {
        Self {
            name: name.into(),
            representative,
            index_fn,
        }
    }
}

impl<F> Material for FnMaterial<F>
where
    F: Fn(f64, IndexComponent) -> Complex64 + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn index(&self, frequency: f64, component: IndexComponent) -> Complex64 {
        (self.index_fn)(frequency, component)
    }

    fn representative_index(&self) -> Complex64 {
        self.representative
    }
}

/// Electric permittivity of free space (F/m).
pub const EPSILON_0: f64 = 8.854e-12;
/// Electron charge (C).
pub const ELECTRON_CHARGE: f64 = 1.6022e-19;
/// Electron mass (kg).
pub const ELECTRON_MASS: f64 = 9.109e-31;

/// Convert a frequency (Hz) to an angular frequency (rad/s).
pub fn angular_frequency(frequency: f64) -> f64 {
    2.0 * std::f64::consts::PI * frequency
}

/// Square of the plasma frequency $\omega_p^2 = N e^2 / (\epsilon_0 m_0)$
/// for an oscillator density N (m⁻³).
pub fn plasma_frequency_squared(density: f64) -> f64 {
    density * ELECTRON_CHARGE * ELECTRON_CHARGE / (EPSILON_0 * ELECTRON_MASS)
}

/// A single-resonance Lorentz oscillator medium.
///
/// The relative permittivity is
/// $\epsilon(\omega) = 1 + \chi
///   + \omega_p^2 \frac{\omega_0^2 - \omega^2 + i\gamma\omega}
///                     {(\omega_0^2 - \omega^2)^2 + (\gamma\omega)^2}$
/// and the index follows from $\tilde{n} = \sqrt{\epsilon}$. The
/// near-resonance Lorentzian approximation is available for comparison with
/// textbook lineshapes.
#[derive(Debug, Clone, PartialEq)]
pub struct LorentzOscillator {
    name: String,
    /// Oscillator density N (m⁻³).
    pub density: f64,
    /// Resonance angular frequency ω₀ (rad/s).
    pub resonance: f64,
    /// Damping rate γ (rad/s).
    pub linewidth: f64,
    /// Background susceptibility χ.
    pub susceptibility: f64,
    /// Use the near-resonance Lorentzian approximation of ε.
    pub approximate: bool,
}

impl LorentzOscillator {
    pub fn new(
        name: impl Into<String>,
        density: f64,
        resonance: f64,
        linewidth: f64,
        susceptibility: f64,
    ) -> Self {
        Self {
            name: name.into(),
            density,
            resonance,
            linewidth,
            susceptibility,
            approximate: false,
        }
    }

    /// High-frequency permittivity $\epsilon_\infty = 1 + \chi$.
    pub fn epsilon_inf(&self) -> f64 {
        1.0 + self.susceptibility
    }

    /// Static permittivity $\epsilon_{st} = 1 + \chi + \omega_p^2/\omega_0^2$.
    pub fn epsilon_static(&self) -> f64 {
        self.epsilon_inf() + plasma_frequency_squared(self.density) / self.resonance.powi(2)
    }

    /// Complex relative permittivity at angular frequency ω.
    pub fn permittivity(&self, omega: f64) -> Complex64 {
        if self.approximate {
            // Lorentzian lineshape around ω₀, valid for |ω − ω₀| ≪ ω₀.
            let domega = omega - self.resonance;
            let strength = self.epsilon_static() - self.epsilon_inf();
            let denom = 4.0 * domega * domega + self.linewidth * self.linewidth;
            let re = self.epsilon_inf() - strength * 2.0 * self.resonance * domega / denom;
            let im = strength * self.linewidth * self.resonance / denom;
            Complex64::new(re, im)
        } else {
            let wp2 = plasma_frequency_squared(self.density);
            let detuning = self.resonance.powi(2) - omega * omega;
            let denom = detuning * detuning + (self.linewidth * omega).powi(2);
            Complex64::new(
                1.0 + self.susceptibility + wp2 * detuning / denom,
                wp2 * self.linewidth * omega / denom,
            )
        }
    }
}

impl Material for LorentzOscillator {
    fn name(&self) -> &str {
        &self.name
    }

    fn index(&self, frequency: f64, _component: IndexComponent) -> Complex64 {
        let eps = self.permittivity(angular_frequency(frequency));
        // n = sqrt((ε₁ + |ε|)/2), k = sqrt((−ε₁ + |ε|)/2): the principal
        // square root of ε written out in real arithmetic.
        let magnitude = eps.norm();
        Complex64::new(
            (0.5 * (eps.re + magnitude)).sqrt(),
            (0.5 * (magnitude - eps.re)).sqrt(),
        )
    }

    fn representative_index(&self) -> Complex64 {
        Complex64::new(self.epsilon_inf().sqrt(), 0.0)
    }
}

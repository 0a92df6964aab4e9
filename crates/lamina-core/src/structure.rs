//! Layers and multilayer stacks.
//!
//! A [`Layer`] is a slab of one material with a thickness; a [`Multilayer`]
//! is an ordered stack of at least two layers, the first and last being the
//! semi-infinite incidence and exit half-spaces. Layers are shared handles:
//! a stack stores references, not copies, so mutating a layer's thickness or
//! its material between sweeps is visible through every stack and simulation
//! holding it.

use std::sync::{Arc, RwLock};

use ndarray::{Array1, Array2};
use num_complex::Complex64;
use thiserror::Error;

use crate::material::{IndexComponent, MaterialHandle};

/// Errors from constructing or mutating layer stacks.
#[derive(Debug, Error)]
pub enum StructureError {
    #[error("Layer thickness must be non-negative, got {0}")]
    NegativeThickness(f64),

    #[error("A multilayer needs at least 2 layers (incidence and exit media), got {0}")]
    TooFewLayers(usize),
}

#[derive(Debug)]
struct LayerData {
    material: MaterialHandle,
    thickness: f64,
}

/// A slab of material with a thickness, the atomic unit of a stack.
///
/// Thickness zero marks a semi-infinite boundary medium when the layer sits
/// at either end of a stack. Cloning a `Layer` aliases it; use
/// [`Layer::set_thickness`] to vary geometry between simulate calls without
/// rebuilding the stack.
#[derive(Debug, Clone)]
pub struct Layer {
    inner: Arc<RwLock<LayerData>>,
}

impl Layer {
    /// A finite slab of the given material.
    pub fn new(material: impl Into<MaterialHandle>, thickness: f64) -> Result<Self, StructureError> {
        if thickness < 0.0 {
            return Err(StructureError::NegativeThickness(thickness));
        }
        Ok(Self {
            inner: Arc::new(RwLock::new(LayerData {
                material: material.into(),
                thickness,
            })),
        })
    }

    /// A semi-infinite boundary medium (zero thickness).
    pub fn semi_infinite(material: impl Into<MaterialHandle>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(LayerData {
                material: material.into(),
                thickness: 0.0,
            })),
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, LayerData> {
        self.inner.read().unwrap_or_else(|e| e.into_inner())
    }

    pub fn thickness(&self) -> f64 {
        self.read().thickness
    }

    /// Replace the thickness in place. Visible through every clone.
    pub fn set_thickness(&self, thickness: f64) -> Result<(), StructureError> {
        if thickness < 0.0 {
            return Err(StructureError::NegativeThickness(thickness));
        }
        self.inner
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .thickness = thickness;
        Ok(())
    }

    /// Handle to the layer's material (shared, not copied).
    pub fn material(&self) -> MaterialHandle {
        self.read().material.clone()
    }

    /// Complex index of the layer's material at a frequency (Hz).
    pub fn index(&self, frequency: f64, component: IndexComponent) -> Complex64 {
        self.read().material.index(frequency, component)
    }

    /// Representative index of the layer's material (no-frequency query).
    pub fn representative_index(&self) -> Complex64 {
        self.read().material.representative_index()
    }
}

/// An ordered stack of layers: incidence half-space, internal layers, exit
/// half-space.
///
/// The stack owns the ordering but not the layers; constituent layers and
/// materials remain independently mutable through their own handles.
#[derive(Debug, Clone)]
pub struct Multilayer {
    layers: Vec<Layer>,
}

impl Multilayer {
    /// Build a stack from an ordered layer sequence.
    ///
    /// Fails with [`StructureError`] if fewer than 2 layers are supplied or
    /// any layer currently has a negative thickness.
    pub fn new(layers: Vec<Layer>) -> Result<Self, StructureError> {
        if layers.len() < 2 {
            return Err(StructureError::TooFewLayers(layers.len()));
        }
        for layer in &layers {
            let t = layer.thickness();
            if t < 0.0 {
                return Err(StructureError::NegativeThickness(t));
            }
        }
        Ok(Self { layers })
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Thickness of each layer, in stack order.
    pub fn thicknesses(&self) -> Array1<f64> {
        self.layers.iter().map(Layer::thickness).collect()
    }

    /// Finite buffer thickness on the incidence side.
    ///
    /// A nonzero thickness on the first layer is not dropped: it shifts the
    /// reference plane of boundary monitors into the incidence medium by
    /// that distance.
    pub fn incident_buffer(&self) -> f64 {
        self.layers.first().map_or(0.0, Layer::thickness)
    }

    /// Finite buffer thickness on the exit side (see [`incident_buffer`]).
    ///
    /// [`incident_buffer`]: Multilayer::incident_buffer
    pub fn exit_buffer(&self) -> f64 {
        self.layers.last().map_or(0.0, Layer::thickness)
    }

    /// Complex index of every layer over a frequency sweep.
    ///
    /// Shape `(n_layers, n_frequencies)`, the matrix form STACK-style
    /// solvers take directly.
    pub fn index_profile(
        &self,
        frequencies: &[f64],
        component: IndexComponent,
    ) -> Array2<Complex64> {
        let mut profile = Array2::zeros((self.layers.len(), frequencies.len()));
        for (i, layer) in self.layers.iter().enumerate() {
            for (j, &f) in frequencies.iter().enumerate() {
                profile[[i, j]] = layer.index(f, component);
            }
        }
        profile
    }
}

//! Registry of every known UGen descriptor.
//!
//! The registry provides a centralized way to look up UGen classes by the
//! name written in `.scsyndef` files and to list them by category. All
//! descriptors in this crate, plus the compiler built-ins from
//! [`scgraph_core::BUILTINS`], are registered automatically.

use scgraph_core::{
    BUILTINS, Result, SynthDef, UGenCatalog, UGenCategory, UGenSpec, decode_synthdef,
    decode_synthdefs,
};

use crate::{buffers, delays, envelopes, filters, io, noise, oscillators, panning, spectral};

/// Registry of all available UGen descriptors.
pub struct UGenRegistry {
    entries: Vec<&'static UGenSpec>,
}

impl Default for UGenRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for UGenRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UGenRegistry")
            .field("len", &self.entries.len())
            .finish()
    }
}

impl UGenRegistry {
    /// Create a new registry with all built-in descriptors registered.
    pub fn new() -> Self {
        let mut registry = Self {
            entries: Vec::with_capacity(128),
        };
        registry.register_builtin_ugens();
        tracing::debug!("ugen_registry: {} descriptors", registry.len());
        registry
    }

    /// Register all built-in descriptors.
    fn register_builtin_ugens(&mut self) {
        // Controls, operators, LocalBuf and PV_Copy
        self.register_all(BUILTINS);

        // Sources
        self.register_all(oscillators::UGENS);
        self.register_all(noise::UGENS);

        // Processors
        self.register_all(filters::UGENS);
        self.register_all(delays::UGENS);
        self.register_all(spectral::UGENS);
        self.register_all(panning::UGENS);

        // Lifecycle, buses and buffers
        self.register_all(envelopes::UGENS);
        self.register_all(io::UGENS);
        self.register_all(buffers::UGENS);
    }

    fn register_all(&mut self, specs: &[&'static UGenSpec]) {
        for &spec in specs {
            self.register(spec);
        }
    }

    /// Register a descriptor with the registry.
    fn register(&mut self, spec: &'static UGenSpec) {
        debug_assert!(
            self.get(spec.name).is_none(),
            "duplicate UGen descriptor: {}",
            spec.name
        );
        self.entries.push(spec);
    }

    /// Returns all registered descriptors.
    pub fn all(&self) -> Vec<&UGenSpec> {
        self.entries.iter().copied().collect()
    }

    /// Returns descriptors in a specific category.
    pub fn in_category(&self, category: UGenCategory) -> Vec<&UGenSpec> {
        self.entries
            .iter()
            .copied()
            .filter(|spec| spec.category == category)
            .collect()
    }

    /// Get a descriptor by class name.
    pub fn get(&self, name: &str) -> Option<&UGenSpec> {
        self.entries.iter().copied().find(|spec| spec.name == name)
    }

    /// Returns the number of registered descriptors.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no descriptors are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl UGenCatalog for UGenRegistry {
    fn lookup(&self, name: &str) -> Option<&UGenSpec> {
        self.get(name)
    }
}

/// Decodes a single-definition `SCgf` file with the full catalog.
///
/// # Errors
///
/// [`SynthDefError::MalformedBinary`](scgraph_core::SynthDefError::MalformedBinary)
/// for invalid data or a file holding more than one SynthDef.
pub fn decompile(bytes: &[u8]) -> Result<SynthDef> {
    decode_synthdef(bytes, &UGenRegistry::new())
}

/// Decodes every SynthDef in an `SCgf` file with the full catalog.
pub fn decompile_all(bytes: &[u8]) -> Result<Vec<SynthDef>> {
    decode_synthdefs(bytes, &UGenRegistry::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_creation() {
        let registry = UGenRegistry::new();
        assert_eq!(registry.len(), 100);
        assert!(!registry.is_empty());
    }

    #[test]
    fn test_all_ugens() {
        let registry = UGenRegistry::new();
        let ugens = registry.all();
        assert_eq!(ugens.len(), registry.len());
        assert_eq!(ugens[0].name, "Control");
    }

    #[test]
    fn test_get_ugen() {
        let registry = UGenRegistry::new();

        let sin_osc = registry.get("SinOsc");
        assert!(sin_osc.is_some());
        assert_eq!(sin_osc.unwrap().inputs[0].name, "frequency");

        let nonexistent = registry.get("NotAUGen");
        assert!(nonexistent.is_none());
    }

    #[test]
    fn test_ugens_by_category() {
        let registry = UGenRegistry::new();

        let delays = registry.in_category(UGenCategory::Delay);
        assert_eq!(delays.len(), 9); // Delay, Comb, Allpass x N/L/C

        let panning = registry.in_category(UGenCategory::Panning);
        assert_eq!(panning.len(), 5); // Pan2, LinPan2, Balance2, Pan4, PanAz

        let spectral = registry.in_category(UGenCategory::Spectral);
        assert_eq!(spectral.len(), 12); // FFT, IFFT, nine PV_*, PV_Copy

        let buffer = registry.in_category(UGenCategory::Buffer);
        assert_eq!(buffer.len(), 9); // six here, LocalBuf, MaxLocalBufs, BufFrames

        let control = registry.in_category(UGenCategory::Control);
        assert_eq!(control.len(), 4); // Control, LagControl, TrigControl, AudioControl
    }

    #[test]
    fn test_names_are_unique() {
        let registry = UGenRegistry::new();
        let mut names: Vec<&str> = registry.all().iter().map(|s| s.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), registry.len());
    }

    #[test]
    fn test_every_descriptor_has_a_rate() {
        let registry = UGenRegistry::new();
        for spec in registry.all() {
            assert!(!spec.rates.is_empty(), "{} has no rates", spec.name);
            assert!(!spec.description.is_empty(), "{} has no description", spec.name);
        }
    }

    #[test]
    fn test_catalog_lookup() {
        let registry = UGenRegistry::new();
        let catalog: &dyn UGenCatalog = &registry;
        assert_eq!(catalog.lookup("MulAdd").map(|s| s.name), Some("MulAdd"));
        assert_eq!(catalog.lookup("PV_MagMul").map(|s| s.inputs.len()), Some(2));
    }
}

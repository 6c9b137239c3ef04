//! Realfin Node — module runtime plus the insurance and tokenization state
//! machines.

pub mod modules;
pub mod runtime;

pub use runtime::{App, RuntimeConfig};

#[cfg(test)]
mod tests {
    #[test]
    fn crate_loads() {
        // Empty body: if this test runs, the crate compiles and loads.
    }
}

//! Integration tests for the dexmorph workspace.

#[cfg(test)]
mod core;
#[cfg(test)]
mod e2e;
#[cfg(test)]
mod transforms;

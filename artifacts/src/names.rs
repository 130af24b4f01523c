//! Derived tensor-name conventions shared by the training and optimizer
//! graphs. Both graphs must agree on these, in trainable-name order.

/// Gradient tensor name for a parameter.
pub fn grad(param: &str) -> String {
    format!("{param}_grad")
}

/// Post-optimizer-step output name for a parameter.
pub fn stepped(param: &str) -> String {
    format!("{param}.out")
}

/// Reads `probe` until `done` accepts the value or `budget` reads have been made.
///
/// There is no sleep between reads; elapsed time depends on the bus. Returns
/// `Ok(None)` when the budget runs out, and the first probe error otherwise.
pub fn bounded<T, E>(
    budget: u32,
    mut probe: impl FnMut() -> Result<T, E>,
    mut done: impl FnMut(&T) -> bool,
) -> Result<Option<T>, E> {
    for _ in 0..budget {
        let value = probe()?;
        if done(&value) {
            return Ok(Some(value));
        }
    }
    Ok(None)
}

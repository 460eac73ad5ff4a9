pub mod init;
pub mod prob;
pub mod roll;
pub mod session;
pub mod settings;

use st_mechanics::RngDieSource;

/// Dice for one invocation: reproducible with a seed, OS-seeded otherwise.
fn dice_for(seed: Option<u64>) -> RngDieSource {
    match seed {
        Some(seed) => {
            tracing::debug!(seed, "seeded dice");
            RngDieSource::seeded(seed)
        }
        None => RngDieSource::from_entropy(),
    }
}

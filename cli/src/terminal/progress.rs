use indicatif::ProgressStyle;

/// Style of the live sweep bar: completed probes over total addresses.
pub fn sweep_bar_style() -> ProgressStyle {
    ProgressStyle::with_template(
        "{spinner:.green} [{bar:40.green/black}] {pos}/{len} hosts probed ({elapsed})",
    )
    .unwrap()
    .progress_chars("█▓░")
}

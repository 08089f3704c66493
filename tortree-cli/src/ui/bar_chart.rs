/// Eighths of a cell, from empty to full
const BLOCKS: [char; 9] = [' ', '▏', '▎', '▍', '▌', '▋', '▊', '▉', '█'];

/// Bar of `width` cells filled to `fraction` (`0.0..=1.0`) with
/// sub-cell precision, padded with spaces
pub fn progress_bar(fraction: f64, width: usize) -> String {
    let eighths = (fraction.clamp(0.0, 1.0) * (width * 8) as f64).round() as usize;
    let full = eighths / 8;
    let partial = eighths % 8;

    let mut bar: String = std::iter::repeat_n(BLOCKS[8], full).collect();
    if partial > 0 {
        bar.push(BLOCKS[partial]);
    }
    let used = full + usize::from(partial > 0);
    bar.extend(std::iter::repeat_n(' ', width.saturating_sub(used)));
    bar
}

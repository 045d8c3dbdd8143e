use keyflow_core::settings::settings;
use keyflow_core::{CandidateResolver, MemorySurface};

use super::{display_width, pad};

/// Show the pending-space candidates for a caret between `before` and `after`.
pub fn candidates_cmd(before: &str, after: &str, json: bool) {
    let doc = MemorySurface::with_text(&format!("{before}{after}"), before.chars().count());
    let resolver = CandidateResolver::from_settings(settings());
    let candidates = resolver.generate(Some(&doc));

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&candidates).expect("JSON serialization failed")
        );
        return;
    }

    let ctx = resolver.extract(&doc).unwrap_or_default();
    println!("context: {:?} | {:?}", ctx.left, ctx.right);
    let width = candidates
        .iter()
        .map(|c| display_width(&format!("{:?}", c.kind)))
        .max()
        .unwrap_or(0);
    for (i, c) in candidates.iter().enumerate() {
        println!(
            "#{i}: {} {:?}",
            pad(&format!("{:?}", c.kind), width),
            c.render_text
        );
    }
}

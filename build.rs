fn main() {
    // Embeds the application manifest (per-monitor DPI awareness). Does nothing
    // when the target is not Windows.
    embed_resource::compile("fakeshutdown.rc", embed_resource::NONE)
        .manifest_optional()
        .unwrap();
}

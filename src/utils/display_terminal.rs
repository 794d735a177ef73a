//! Terminal output used while the server boots.
//!
//! Registry bootstrap and the startup banner print straight to stdout so the
//! progress is readable even when `RUST_LOG` filters out `info`.

const BOX_WIDTH: usize = 52;

/// Prints a title centered inside a double-line box
pub fn print_boxed_title(title: &str) {
    let border = "═".repeat(BOX_WIDTH);
    println!("╔{}╗", border);
    println!("║{:^width$}║", title, width = BOX_WIDTH - 1);
    println!("╚{}╝", border);
}

pub fn print_step_start(step: u8, description: &str) {
    println!("→ Step {}: {}", step, description);
}

pub fn print_step_complete(step: u8, description: &str, count: usize) {
    println!("✓ Step {}: {} ({} items)", step, description, count);
}

pub fn print_sub_task(name: &str, status: &str) {
    println!("   ├─ {}: {}", name, status);
}

pub fn print_cache_initialized(kind: &str, count: usize) {
    println!("   ├─ {} registrations: {}", kind, count);
}

pub fn print_final_summary(repositories: usize, services: usize) {
    println!();
    print_boxed_title("🎉 SERVICE REGISTRY READY");
    println!("   📦 Repositories: {}", repositories);
    println!("   🔧 Services: {}", services);
    println!("   🚀 Total Components: {}", repositories + services);
    println!();
}

/// Prints the listening address and the API entry points
pub fn print_startup_banner(bind_address: &str, environment: &str) {
    print_boxed_title("🌍 YOUTH HUB API");
    println!("   ├─ environment: {}", environment);
    println!("   ├─ listening:   http://{}", bind_address);
    println!("   ├─ health:      http://{}/health", bind_address);
    println!("   └─ api root:    http://{}/api", bind_address);
    println!();
}

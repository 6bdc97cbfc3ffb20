/*! Integration tests for Veneer.
 *
 * This test suite is organized as a single integration test binary
 * following the pattern described by matklad in
 * https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html
 *
 * The module structure mirrors the main library structure:
 * - value: Tests for base values (Value, Map, List) and JSON interop
 * - overlay: Tests for MapOverlay and ListOverlay, including layered overlays
 * - query: Tests for freeze, equals, has_changed and the other handle queries
 */

use tracing_subscriber::EnvFilter;

#[ctor::ctor]
fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("veneer=info".parse().unwrap()),
        )
        .with_test_writer()
        .try_init();
}

mod helpers;
mod query;

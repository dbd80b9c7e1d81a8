//! Kani proof harnesses for the pure string helpers.
//!
//! Kani is not a Cargo dependency. Install and run with:
//!
//! ```bash
//! cargo install --locked kani-verifier
//! cargo kani setup
//! cargo kani --features kani
//! ```
//!
//! This module is only compiled when using Kani (`#[cfg(kani)]`).

use crate::parser::is_valid_scheme;
use crate::path::{common_path, trim_slashes};
use crate::{MAX_PORT, MIN_PORT, ensure_valid_port};

/// Characters that exercise path and scheme edge cases.
const PATH_CHARS: &[u8] = b"ab/.:+-1";

/// Generate a short string over `PATH_CHARS`
fn arbitrary_path(max: usize) -> String {
    let len: usize = kani::any();
    let len = len % (max + 1);
    (0..len)
        .map(|_| {
            let idx: usize = kani::any();
            PATH_CHARS[idx % PATH_CHARS.len()] as char
        })
        .collect()
}

#[kani::proof]
#[kani::unwind(8)]
fn proof_port_range_accepted() {
    let port: u32 = kani::any();
    kani::assume((MIN_PORT..=MAX_PORT).contains(&port));
    assert!(ensure_valid_port(&port.to_string()).is_ok());
}

#[kani::proof]
#[kani::unwind(8)]
fn proof_port_out_of_range_rejected() {
    let port: u32 = kani::any();
    kani::assume(port == 0 || port > MAX_PORT);
    assert!(ensure_valid_port(&port.to_string()).is_err());
}

#[kani::proof]
#[kani::unwind(6)]
fn proof_scheme_starts_with_letter() {
    let scheme = arbitrary_path(4);
    if is_valid_scheme(&scheme) {
        assert!(scheme.as_bytes()[0].is_ascii_alphabetic());
        assert!(!scheme.contains('/'));
        assert!(!scheme.contains(':'));
    }
}

#[kani::proof]
#[kani::unwind(6)]
fn proof_common_path_is_shared_directory() {
    let one = arbitrary_path(4);
    let two = arbitrary_path(4);
    let common = common_path(&one, &two);
    assert!(one.starts_with(&common));
    assert!(two.starts_with(&common));
    assert!(common.is_empty() || common.ends_with('/'));
}

#[kani::proof]
#[kani::unwind(6)]
fn proof_common_path_symmetric() {
    let one = arbitrary_path(4);
    let two = arbitrary_path(4);
    assert_eq!(common_path(&one, &two), common_path(&two, &one));
}

#[kani::proof]
#[kani::unwind(6)]
fn proof_trim_slashes_has_no_edge_slashes() {
    let path = arbitrary_path(4);
    let trimmed = trim_slashes(&path);
    assert!(!trimmed.starts_with('/'));
    assert!(!trimmed.ends_with('/'));
}

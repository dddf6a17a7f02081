// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
// Enable coverage(off) attribute for excluding test infrastructure
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Adapters for external collaborators: the resource store, package
//! assemblers, transports and status document resolvers

pub mod assemble;
pub mod status;
pub mod store;
pub mod traced;
pub mod transport;

pub use assemble::{
    compute_checksums, AssembleError, Assembler, BundleAssembler, Checksum, PackageStream,
};
pub use status::{
    AtomStatementParser, FilesystemStatusResolver, JsonStatementParser, ResolveError,
    StatementParser, StatusResolver,
};
pub use store::{FsResourceClient, ResourceClient, StoreError};
pub use traced::{TracedAssembler, TracedStatusResolver, TracedTransport};
pub use transport::{
    DepositMetadata, FilesystemTransport, Receipt, StatementFormat, Transport, TransportError,
    TransportSession,
};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
pub use assemble::{AssembleCall, FakeAssembler};
#[cfg(any(test, feature = "test-support"))]
pub use status::FakeStatusResolver;
#[cfg(any(test, feature = "test-support"))]
pub use store::{FakeResourceClient, StoreCall, StoreOp};
#[cfg(any(test, feature = "test-support"))]
pub use transport::{FakeTransport, TransportCall};

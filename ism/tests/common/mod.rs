//! Shared fixture: watchers {A, B, C} with threshold 2, delegate S routed
//! for origin 5, a 100 second fraud window and the clock at 1000.
#![allow(dead_code)]

use std::sync::Arc;

use oism_crypto::derive_address;
use oism_ism::OptimisticIsm;
use oism_messages::Message;
use oism_modules::{DelegateDirectory, StaticWatcherSet};
use oism_nullables::{NullClock, NullDelegate};
use oism_types::{Address, Domain, MessageId};

pub const ORIGIN: Domain = 5;
pub const FRAUD_WINDOW: u64 = 100;
pub const START: u64 = 1000;

pub struct Harness {
    pub ism: Arc<OptimisticIsm>,
    pub clock: Arc<NullClock>,
    pub directory: Arc<DelegateDirectory>,
    pub owner: Address,
    pub watchers: [Address; 3],
    pub delegate: Address,
    pub module: Arc<NullDelegate>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_threshold(2)
    }

    pub fn with_threshold(threshold: u8) -> Self {
        let owner = derive_address("owner");
        let watchers = [
            derive_address("watcher-a"),
            derive_address("watcher-b"),
            derive_address("watcher-c"),
        ];
        let delegate = derive_address("delegate-s");
        let module = Arc::new(NullDelegate::accepting());

        let directory = Arc::new(DelegateDirectory::new());
        directory.register(delegate, module.clone());

        let clock = Arc::new(NullClock::new(START));
        let ism = OptimisticIsm::new(
            owner,
            FRAUD_WINDOW,
            Arc::new(StaticWatcherSet::new(watchers.to_vec(), threshold).unwrap()),
            directory.clone(),
            clock.clone(),
        )
        .unwrap();
        ism.set_route(owner, delegate, ORIGIN).unwrap();

        Self {
            ism: Arc::new(ism),
            clock,
            directory,
            owner,
            watchers,
            delegate,
            module,
        }
    }

    pub fn at(&self, secs: u64) -> &Self {
        self.clock.set(secs);
        self
    }
}

pub fn message_from(origin: Domain, nonce: u32) -> Vec<u8> {
    Message::new(
        nonce,
        origin,
        derive_address("sender"),
        77,
        derive_address("recipient"),
        format!("body-{nonce}").into_bytes(),
    )
    .encode()
}

pub fn message(nonce: u32) -> Vec<u8> {
    message_from(ORIGIN, nonce)
}

pub fn id_of(message: &[u8]) -> MessageId {
    oism_crypto::hash_message(message)
}

use proptest::prelude::*;

use civic_ledger::{DelegationMode, LedgerConfig, LedgerError, VotingLedger};
use civic_types::{Address, ChainContext, Timestamp, TokenAmount};

const ACCOUNTS: usize = 5;

fn account(i: usize) -> Address {
    Address::from_label(&format!("account-{i}"))
}

#[derive(Clone, Debug)]
enum Op {
    Transfer { from: usize, to: usize, amount: u64 },
    Delegate { holder: usize, to: usize },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..ACCOUNTS, 0..ACCOUNTS, 0u64..400_000).prop_map(|(from, to, amount)| Op::Transfer {
            from,
            to,
            amount
        }),
        (0..ACCOUNTS, 0..ACCOUNTS).prop_map(|(holder, to)| Op::Delegate { holder, to }),
    ]
}

fn mode_strategy() -> impl Strategy<Value = DelegationMode> {
    prop_oneof![Just(DelegationMode::Implicit), Just(DelegationMode::Explicit)]
}

fn run(mode: DelegationMode, ops: &[Op]) -> VotingLedger {
    let config = LedgerConfig {
        delegation_mode: mode,
        ..LedgerConfig::default()
    };
    let mut ledger = VotingLedger::deploy(&config, account(0), &ChainContext::default()).unwrap();
    for (i, op) in ops.iter().enumerate() {
        let block = i as u64 + 1;
        let ctx = ChainContext::new(block, Timestamp::new(block * 12));
        let result = match op {
            Op::Transfer { from, to, amount } => ledger.transfer(
                &ctx,
                account(*from),
                account(*to),
                TokenAmount::whole(*amount),
            ),
            Op::Delegate { holder, to } => ledger.delegate(&ctx, account(*holder), account(*to)),
        };
        match result {
            Ok(()) | Err(LedgerError::InsufficientBalance { .. }) => {}
            Err(e) => panic!("unexpected ledger error: {e}"),
        }
    }
    ledger
}

proptest! {
    /// Balances always sum to total supply; voting power never exceeds it.
    #[test]
    fn supply_and_power_are_conserved(
        mode in mode_strategy(),
        ops in prop::collection::vec(op_strategy(), 0..40),
    ) {
        let ledger = run(mode, &ops);
        prop_assert!(ledger.check_invariants().is_ok());
        prop_assert_eq!(ledger.total_supply(), TokenAmount::whole(1_000_000));
    }

    /// Each holder's balance shows up as voting power of exactly its delegate.
    #[test]
    fn votes_match_delegated_balances(
        mode in mode_strategy(),
        ops in prop::collection::vec(op_strategy(), 0..40),
    ) {
        let ledger = run(mode, &ops);
        for d in 0..ACCOUNTS {
            let delegate = account(d);
            let expected = (0..ACCOUNTS)
                .filter(|h| ledger.delegates(&account(*h)) == Some(delegate))
                .map(|h| ledger.balance_of(&account(h)).raw())
                .sum::<u128>();
            prop_assert_eq!(ledger.get_votes(&delegate).raw(), expected);
        }
    }

    /// Past lookups never change once their block is finalized.
    #[test]
    fn history_is_immutable(
        prefix in prop::collection::vec(op_strategy(), 1..20),
        suffix in prop::collection::vec(op_strategy(), 1..20),
    ) {
        let before = run(DelegationMode::Implicit, &prefix);
        let mut all = prefix.clone();
        all.extend(suffix.iter().cloned());
        let after = run(DelegationMode::Implicit, &all);

        let last = prefix.len() as u64;
        let now = ChainContext::new(all.len() as u64 + 1, Timestamp::EPOCH);
        for a in 0..ACCOUNTS {
            let account = account(a);
            prop_assert_eq!(
                before.get_votes(&account),
                after.get_past_votes(&account, last, &now).unwrap()
            );
        }
    }

    /// A failed transfer leaves the ledger untouched.
    #[test]
    fn failed_transfer_is_atomic(excess in 1u64..1_000) {
        let mut ledger = run(DelegationMode::Implicit, &[]);
        let ctx = ChainContext::new(1, Timestamp::EPOCH);
        let amount = TokenAmount::whole(1_000_000 + excess);
        let result = ledger.transfer(&ctx, account(0), account(1), amount);
        prop_assert!(result.is_err());
        prop_assert_eq!(ledger.balance_of(&account(0)), TokenAmount::whole(1_000_000));
        prop_assert_eq!(ledger.num_checkpoints(&account(1)), 0);
    }
}

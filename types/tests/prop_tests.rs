use proptest::prelude::*;

use civic_types::{Address, OperationId, ProposalId, Timestamp, TokenAmount};

proptest! {
    /// Address text form parses back to the same address.
    #[test]
    fn address_text_roundtrip(bytes in any::<[u8; 20]>()) {
        let addr = Address::new(bytes);
        let parsed: Address = addr.to_string().parse().unwrap();
        prop_assert_eq!(parsed, addr);
    }

    /// Address survives bincode, which is what ledger snapshots use.
    #[test]
    fn address_bincode_roundtrip(bytes in any::<[u8; 20]>()) {
        let addr = Address::new(bytes);
        let encoded = bincode::serialize(&addr).unwrap();
        let decoded: Address = bincode::deserialize(&encoded).unwrap();
        prop_assert_eq!(decoded, addr);
    }

    /// Any raw amount prints as a decimal that parses back exactly.
    #[test]
    fn amount_display_parses_back(raw in any::<u128>()) {
        let amount = TokenAmount::from_raw(raw);
        let parsed = TokenAmount::parse_decimal(&amount.to_string()).unwrap();
        prop_assert_eq!(parsed, amount);
    }

    /// checked_add / checked_sub agree with u128 checked arithmetic.
    #[test]
    fn amount_checked_ops_match_u128(a in any::<u128>(), b in any::<u128>()) {
        let x = TokenAmount::from_raw(a);
        let y = TokenAmount::from_raw(b);
        prop_assert_eq!(x.checked_add(y).map(|v| v.raw()), a.checked_add(b));
        prop_assert_eq!(x.checked_sub(y).map(|v| v.raw()), a.checked_sub(b));
    }

    /// Timestamp ordering: new(a) <= new(b) iff a <= b.
    #[test]
    fn timestamp_ordering(a in any::<u64>(), b in any::<u64>()) {
        let ta = Timestamp::new(a);
        let tb = Timestamp::new(b);
        prop_assert_eq!(ta <= tb, a <= b);
        prop_assert_eq!(tb.has_arrived(ta), a >= b);
    }

    /// Identifier Display is always 64 hex digits.
    #[test]
    fn id_display_is_full_hex(bytes in any::<[u8; 32]>()) {
        prop_assert_eq!(ProposalId::new(bytes).to_string().len(), 64);
        prop_assert_eq!(OperationId::new(bytes).to_string().len(), 64);
    }
}

//! Proptest generators for property-based testing.

use proptest::prelude::*;

use rootless_core::{Content, Identity, Keypair, PublicKey};

/// Generate a deterministic keypair from an arbitrary seed.
pub fn keypair() -> impl Strategy<Value = Keypair> {
    any::<[u8; 32]>().prop_map(|seed| Keypair::from_seed(&seed))
}

/// Generate a deterministic identity, optionally named.
pub fn identity() -> impl Strategy<Value = Identity> {
    (any::<[u8; 32]>(), proptest::option::of("[A-Za-z]{1,12}"))
        .prop_map(|(seed, name)| Identity::from_seed(&seed, name.as_deref()))
}

/// Generate a random public key (from a real keypair, so it is a valid
/// curve point).
pub fn public_key() -> impl Strategy<Value = PublicKey> {
    keypair().prop_map(|kp| kp.public_key())
}

/// Generate a post body, including empty and multi-line text.
pub fn body() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        "[ -~]{1,80}",
        "\\PC{1,40}", // arbitrary printable unicode
    ]
}

/// Generate a plausible creation timestamp.
pub fn timestamp() -> impl Strategy<Value = i64> {
    0i64..=4_000_000_000i64
}

/// Parameters for generating signed content.
#[derive(Debug, Clone)]
pub struct ContentParams {
    pub seed: [u8; 32],
    pub body: String,
    pub created_at: i64,
}

impl Arbitrary for ContentParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (any::<[u8; 32]>(), body(), timestamp())
            .prop_map(|(seed, body, created_at)| ContentParams {
                seed,
                body,
                created_at,
            })
            .boxed()
    }
}

/// Build the content described by the parameters.
pub fn content_from_params(params: &ContentParams) -> Content {
    let identity = Identity::from_seed(&params.seed, None);
    Content::create_at(&params.body, &identity, params.created_at)
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn content_is_deterministic(params: ContentParams) {
            let c1 = content_from_params(&params);
            let c2 = content_from_params(&params);
            prop_assert_eq!(&c1.cid, &c2.cid);
            prop_assert_eq!(c1.signature, c2.signature);
        }

        #[test]
        fn generated_content_verifies(params: ContentParams) {
            let content = content_from_params(&params);
            prop_assert!(content.verify());
        }

        #[test]
        fn content_json_roundtrips(params: ContentParams) {
            let content = content_from_params(&params);
            let json = content.export_json().unwrap();
            let back = Content::import_json(&json).unwrap();
            prop_assert_eq!(back, content);
        }

        #[test]
        fn distinct_bodies_distinct_cids(
            seed in any::<[u8; 32]>(),
            b1 in body(),
            b2 in body(),
            ts in timestamp(),
        ) {
            prop_assume!(b1 != b2);
            let identity = Identity::from_seed(&seed, None);
            let c1 = Content::create_at(&b1, &identity, ts);
            let c2 = Content::create_at(&b2, &identity, ts);
            prop_assert_ne!(c1.cid, c2.cid);
        }
    }
}

//! End-to-end protocol scenarios across identities, the ledger, and
//! messaging.

use rootless::{messaging, Chain, Content, Identity, MessagingError, Node};
use rootless_testkit::{multi_party_fixtures, verify_all_vectors, TestFixture};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

#[test]
fn post_and_message_scenario() {
    init_tracing();

    // Identity A posts content onto its chain.
    let a = Identity::create(Some("A"));
    let content = Content::create("Hello, RootlessNet!", &a);
    assert!(content.verify());

    let mut chain = Chain::new();
    let block = chain.add_block(content, a.did().clone()).unwrap();
    assert_eq!(block.index as usize, chain.len() - 1);
    assert!(chain.is_valid());

    // A encrypts for B; B recovers the exact plaintext.
    let b = Identity::create(Some("B"));
    let envelope = messaging::encrypt("secret", &a, &b.public_key()).unwrap();
    let plaintext = messaging::decrypt(&envelope, &b, &a.public_key()).unwrap();
    assert_eq!(plaintext, "secret");

    // A corrupted MAC byte is a hard authentication failure for B.
    let mut parsed = messaging::Envelope::from_json(&envelope).unwrap();
    parsed.mac.0[0] ^= 0x01;
    let result = messaging::decrypt_with(
        messaging::active_suite(),
        &parsed,
        &b,
        &a.public_key(),
    );
    assert!(matches!(result, Err(MessagingError::AuthenticationFailed)));
}

#[test]
fn node_roundtrip_through_collaborator_contracts() {
    init_tracing();

    let mut alice = Node::create(Some("Alice"));
    alice.post("post one").unwrap();
    alice.post("post two").unwrap();

    // Persistence collaborator: chain JSON in, identical valid chain out.
    let chain_json = alice.export_chain().unwrap();
    let restored = Chain::import_json(&chain_json).unwrap();
    assert!(restored.is_valid());
    assert_eq!(restored.blocks(), alice.chain().blocks());

    // Backup collaborator: identity JSON in, opaque blob out, identity back.
    let blob = rootless::backup::export_identity(alice.identity(), "pass phrase").unwrap();
    let recovered = rootless::backup::import_identity(&blob, "pass phrase").unwrap();
    assert_eq!(recovered.did(), alice.identity().did());

    // The recovered identity can still open messages sent to the original.
    let bob = Node::create(Some("Bob"));
    let envelope = bob
        .send("still works", &alice.identity().public_key())
        .unwrap();
    let plaintext = messaging::decrypt(
        &envelope,
        &recovered,
        &bob.identity().public_key(),
    )
    .unwrap();
    assert_eq!(plaintext, "still works");
}

#[test]
fn multi_party_ledger_stays_consistent() {
    init_tracing();

    let parties = multi_party_fixtures(3);
    let mut shared = Chain::new();

    for (i, party) in parties.iter().enumerate() {
        let content = party.make_content(&format!("message {i}"));
        shared
            .add_block(content, party.identity.did().clone())
            .unwrap();
    }

    assert_eq!(shared.len(), 4);
    assert!(shared.is_valid());

    for party in &parties {
        let own = shared.get_blocks_by_author(party.identity.did());
        assert_eq!(own.len(), 1);
        assert!(own[0].content.verify());
    }
}

#[test]
fn tampering_anywhere_is_detected_somewhere() {
    init_tracing();

    let mut fixture = TestFixture::with_seed([0x77; 32]);
    fixture.post("original");

    // Ledger layer: bit-flip a stored hash via the wire form.
    let json = fixture.chain.export_json().unwrap();
    let block_hash = fixture.chain.blocks()[1].hash.to_hex();
    let mut flipped = block_hash.clone().into_bytes();
    flipped[0] = if flipped[0] == b'0' { b'1' } else { b'0' };
    let tampered_json = json.replace(&block_hash, &String::from_utf8(flipped).unwrap());

    let tampered = Chain::import_json(&tampered_json).unwrap();
    assert!(!tampered.is_valid());

    // Content layer: a rewritten body fails its signature even though the
    // struct parses fine.
    let content = fixture.make_content("signed");
    let mut stolen = content.clone();
    stolen.body = "rewritten".into();
    assert!(!stolen.verify());
}

#[test]
fn protocol_vectors_are_deterministic() {
    verify_all_vectors();
}

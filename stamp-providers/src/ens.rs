//! ENS reverse-record provider (existence check)
//!
//! Verifies that the address in the payload has a primary ENS name
//! registered. Resolution follows EIP-181: compute the reverse node
//! `namehash("<addr-hex>.addr.reverse")`, ask the ENS registry for its
//! resolver, then call `name(bytes32)` on that resolver. Any non-empty
//! name passes; an absent resolver or empty name fails with a fixed
//! explanatory message.

use alloy_primitives::{address, hex, keccak256, Address, B256};
use async_trait::async_trait;
use stamp_types::{
    parse_address, Error, Evidence, ProviderId, Result, VerifiedPayload, VerifyRequest,
};

use crate::provider::Provider;
use crate::rpc::JsonRpcClient;

/// The ENS registry contract (same address on mainnet and test networks).
pub const ENS_REGISTRY: Address = address!("00000000000C2E074eC69A0dFb2997BA6C7d2e1e");

/// Error string reported when no reverse record exists.
pub const NO_PRIMARY_NAME: &str = "Primary ENS name was not found for given address.";

/// Adapter seam for reverse name resolution.
///
/// `Ok(None)` means the lookup succeeded but no name is registered;
/// `Err` means the lookup itself could not be completed.
#[async_trait]
pub trait NameResolver: Send + Sync {
    async fn lookup_address(&self, address: Address) -> Result<Option<String>>;
}

/// EIP-137 namehash.
pub fn namehash(name: &str) -> B256 {
    let mut node = B256::ZERO;
    if name.is_empty() {
        return node;
    }
    for label in name.rsplit('.') {
        let label_hash = keccak256(label.as_bytes());
        node = keccak256([node.as_slice(), label_hash.as_slice()].concat());
    }
    node
}

/// The reverse-registrar node for an address:
/// `namehash("<40 lowercase hex chars>.addr.reverse")`.
pub fn reverse_node(address: Address) -> B256 {
    namehash(&format!("{}.addr.reverse", hex::encode(address)))
}

/// First four bytes of the keccak-256 hash of a Solidity function signature.
fn selector(signature: &str) -> [u8; 4] {
    let hash = keccak256(signature.as_bytes());
    [hash[0], hash[1], hash[2], hash[3]]
}

/// Calldata for a single-`bytes32`-argument function.
fn encode_node_call(signature: &str, node: B256) -> Vec<u8> {
    let mut data = Vec::with_capacity(36);
    data.extend_from_slice(&selector(signature));
    data.extend_from_slice(node.as_slice());
    data
}

/// Decode an ABI-encoded address return value. The zero address maps to
/// `None` (the registry reports "no resolver" that way).
fn decode_address(raw: &[u8]) -> Result<Option<Address>> {
    if raw.len() < 32 {
        return Err(Error::MalformedResponse(format!(
            "expected 32-byte address word, got {} bytes",
            raw.len()
        )));
    }
    let address = Address::from_slice(&raw[12..32]);
    Ok((!address.is_zero()).then_some(address))
}

/// Decode an ABI-encoded dynamic string return value.
fn decode_string(raw: &[u8]) -> Result<String> {
    let word_to_usize = |word: &[u8]| -> Result<usize> {
        // Offsets and lengths fit comfortably in the low 8 bytes
        if word[..24].iter().any(|b| *b != 0) {
            return Err(Error::MalformedResponse(
                "string offset/length out of range".to_string(),
            ));
        }
        let mut buf = [0u8; 8];
        buf.copy_from_slice(&word[24..32]);
        Ok(u64::from_be_bytes(buf) as usize)
    };

    if raw.len() < 64 {
        return Err(Error::MalformedResponse(format!(
            "expected ABI string, got {} bytes",
            raw.len()
        )));
    }
    let offset = word_to_usize(&raw[..32])?;
    let length_end = offset
        .checked_add(32)
        .filter(|end| raw.len() >= *end)
        .ok_or_else(|| {
            Error::MalformedResponse("string offset past end of return data".to_string())
        })?;
    let len = word_to_usize(&raw[offset..length_end])?;
    let start = length_end;
    let end = start.checked_add(len).filter(|end| raw.len() >= *end).ok_or_else(|| {
        Error::MalformedResponse("string length past end of return data".to_string())
    })?;
    String::from_utf8(raw[start..end].to_vec())
        .map_err(|e| Error::MalformedResponse(format!("resolved name is not UTF-8: {}", e)))
}

/// Reverse name resolution over a JSON-RPC node endpoint.
pub struct RpcNameResolver {
    rpc: JsonRpcClient,
    registry: Address,
}

impl RpcNameResolver {
    pub fn new(rpc_url: impl Into<String>) -> Result<Self> {
        Ok(Self {
            rpc: JsonRpcClient::new(rpc_url)?,
            registry: ENS_REGISTRY,
        })
    }

    pub fn with_client(rpc: JsonRpcClient) -> Self {
        Self {
            rpc,
            registry: ENS_REGISTRY,
        }
    }

    /// Override the registry address (non-mainnet deployments).
    pub fn with_registry(mut self, registry: Address) -> Self {
        self.registry = registry;
        self
    }

    async fn resolver_for(&self, node: B256) -> Result<Option<Address>> {
        let data = encode_node_call("resolver(bytes32)", node);
        let raw = self.rpc.eth_call(self.registry, &data).await?;
        decode_address(&raw)
    }

    async fn name_at(&self, resolver: Address, node: B256) -> Result<String> {
        let data = encode_node_call("name(bytes32)", node);
        let raw = self.rpc.eth_call(resolver, &data).await?;
        decode_string(&raw)
    }
}

#[async_trait]
impl NameResolver for RpcNameResolver {
    async fn lookup_address(&self, address: Address) -> Result<Option<String>> {
        let node = reverse_node(address);

        let Some(resolver) = self.resolver_for(node).await? else {
            return Ok(None);
        };

        let name = self.name_at(resolver, node).await?;
        Ok((!name.is_empty()).then_some(name))
    }
}

/// The ENS provider: passes when the address has a primary name.
///
/// A request carrying an `rpc_url` is resolved against that endpoint
/// instead of the configured default resolver.
pub struct EnsProvider<R> {
    resolver: R,
}

impl<R: NameResolver> EnsProvider<R> {
    pub fn new(resolver: R) -> Self {
        Self { resolver }
    }

    async fn resolve(
        &self,
        request: &VerifyRequest,
        address: Address,
    ) -> Result<Option<String>> {
        match request.rpc_url.as_deref() {
            Some(url) => RpcNameResolver::new(url)?.lookup_address(address).await,
            None => self.resolver.lookup_address(address).await,
        }
    }
}

#[async_trait]
impl<R: NameResolver> Provider for EnsProvider<R> {
    fn id(&self) -> ProviderId {
        ProviderId::Ens
    }

    async fn verify(&self, request: &VerifyRequest) -> Result<VerifiedPayload> {
        let address =
            parse_address(&request.address).map_err(|e| Error::external(self.id(), e))?;

        let reported = self
            .resolve(request, address)
            .await
            .map_err(|e| Error::external(self.id(), e))?;

        Ok(match reported {
            Some(name) => {
                let mut record = Evidence::new();
                record.insert("ens".to_string(), name);
                VerifiedPayload::passing(record)
            }
            None => VerifiedPayload::failing(vec![NO_PRIMARY_NAME.to_string()]),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::b256;
    use proptest::prelude::*;

    #[test]
    fn test_namehash_empty_is_zero() {
        assert_eq!(namehash(""), B256::ZERO);
    }

    #[test]
    fn test_namehash_reference_vectors() {
        // Published EIP-137 test vectors
        assert_eq!(
            namehash("eth"),
            b256!("93cdeb708b7545dc668eb9280176169d1c33cfd8ed6f04690a0bcc88a93fc4ae")
        );
        assert_eq!(
            namehash("foo.eth"),
            b256!("de9b09fd7c5f901e23a3f19fecc54828e9c848539801e86591bd9801b019f84f")
        );
    }

    #[test]
    fn test_reverse_node_uses_lowercase_hex() {
        let addr = "0xcF314CE817E25b4F784bC1f24c9A79A525fEC50f"
            .parse::<Address>()
            .unwrap();
        let expected = namehash(&format!(
            "{}.addr.reverse",
            "cf314ce817e25b4f784bc1f24c9a79a525fec50f"
        ));
        assert_eq!(reverse_node(addr), expected);
    }

    #[test]
    fn test_known_selectors() {
        assert_eq!(selector("resolver(bytes32)"), [0x01, 0x78, 0xb8, 0xbf]);
        assert_eq!(selector("name(bytes32)"), [0x69, 0x1f, 0x34, 0x31]);
    }

    #[test]
    fn test_encode_node_call_layout() {
        let node = b256!("93cdeb708b7545dc668eb9280176169d1c33cfd8ed6f04690a0bcc88a93fc4ae");
        let data = encode_node_call("resolver(bytes32)", node);
        assert_eq!(data.len(), 36);
        assert_eq!(&data[..4], &[0x01, 0x78, 0xb8, 0xbf]);
        assert_eq!(&data[4..], node.as_slice());
    }

    #[test]
    fn test_decode_address_zero_is_none() {
        let raw = [0u8; 32];
        assert_eq!(decode_address(&raw).unwrap(), None);
    }

    #[test]
    fn test_decode_address_nonzero() {
        let mut raw = [0u8; 32];
        raw[12..].copy_from_slice(&[0xab; 20]);
        let decoded = decode_address(&raw).unwrap().unwrap();
        assert_eq!(decoded, Address::from_slice(&[0xab; 20]));
    }

    #[test]
    fn test_decode_address_short_is_malformed() {
        assert!(matches!(
            decode_address(&[0u8; 10]),
            Err(Error::MalformedResponse(_))
        ));
    }

    fn abi_string(s: &str) -> Vec<u8> {
        let mut raw = vec![0u8; 64];
        raw[31] = 0x20; // offset = 32
        raw[63] = s.len() as u8;
        raw.extend_from_slice(s.as_bytes());
        // Pad to a 32-byte boundary the way the EVM does
        while raw.len() % 32 != 0 {
            raw.push(0);
        }
        raw
    }

    #[test]
    fn test_decode_string_roundtrip() {
        assert_eq!(decode_string(&abi_string("example.eth")).unwrap(), "example.eth");
        assert_eq!(decode_string(&abi_string("")).unwrap(), "");
    }

    proptest! {
        // Decoders over untrusted return data must error, never panic
        #[test]
        fn fuzz_decode_string_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..256)) {
            let _ = decode_string(&bytes);
        }

        #[test]
        fn fuzz_decode_address_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
            let _ = decode_address(&bytes);
        }
    }

    #[test]
    fn test_decode_string_truncated_is_malformed() {
        let mut raw = abi_string("example.eth");
        raw.truncate(70);
        // Length word claims 11 bytes but fewer remain
        raw[63] = 40;
        assert!(matches!(
            decode_string(&raw),
            Err(Error::MalformedResponse(_))
        ));
    }
}

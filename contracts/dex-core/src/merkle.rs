use dex_types::KnockoutLeaf;
use soroban_sdk::{Bytes, BytesN, Env, Vec};

/// Fold one knockout leaf into a commitment root:
/// keccak256(root || be64(entropy) || be64(pivot_time) || be64(fee_mileage))
pub fn fold_leaf(env: &Env, root: &BytesN<32>, leaf: &KnockoutLeaf) -> BytesN<32> {
    let mut data = Bytes::from_array(env, &root.to_array());
    data.extend_from_array(&leaf.entropy.to_be_bytes());
    data.extend_from_array(&leaf.pivot_time.to_be_bytes());
    data.extend_from_array(&leaf.fee_mileage.to_be_bytes());
    env.crypto().keccak256(&data).into()
}

/// Fold `proof` in order starting from `root`
pub fn fold_proof(env: &Env, root: &BytesN<32>, proof: &Vec<KnockoutLeaf>) -> BytesN<32> {
    let mut acc = root.clone();
    for leaf in proof.iter() {
        acc = fold_leaf(env, &acc, &leaf);
    }
    acc
}

//! Murmur3 32 位哈希
//!
//! 种子固定为 37，结果按字节反转后返回，与已有路由系统的输出保持逐位一致。
//! 用于一致路由，不具备密码学强度。

const SEED: u32 = 37;
const C1: u32 = 0xcc9e2d51;
const C2: u32 = 0x1b873593;

#[inline]
fn mix_k1(k1: u32) -> u32 {
    k1.wrapping_mul(C1).rotate_left(15).wrapping_mul(C2)
}

/// 计算 `data` 的哈希值
pub fn murmur3_32(data: &[u8]) -> u32 {
    let mut h1 = SEED;

    let mut blocks = data.chunks_exact(4);
    for block in &mut blocks {
        let k1 = u32::from_le_bytes([block[0], block[1], block[2], block[3]]);
        h1 ^= mix_k1(k1);
        h1 = h1.rotate_left(13).wrapping_mul(5).wrapping_add(0xe6546b64);
    }

    let tail = blocks.remainder();
    if !tail.is_empty() {
        let k1 = tail
            .iter()
            .rev()
            .fold(0u32, |acc, &byte| (acc << 8) | u32::from(byte));
        h1 ^= mix_k1(k1);
    }

    h1 ^= data.len() as u32;

    h1 ^= h1 >> 16;
    h1 = h1.wrapping_mul(0x85ebca6b);
    h1 ^= h1 >> 13;
    h1 = h1.wrapping_mul(0xc2b2ae35);
    h1 ^= h1 >> 16;

    h1.swap_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_empty_input() {
        assert_eq!(murmur3_32(b""), 0x4f075698);
    }

    #[test]
    fn test_known_vectors() {
        // 覆盖 0~3 字节尾部和多块输入
        assert_eq!(murmur3_32(b"a"), 0xc103eab3);
        assert_eq!(murmur3_32(b"ab"), 0x2737f786);
        assert_eq!(murmur3_32(b"abc"), 0x15d257ff);
        assert_eq!(murmur3_32(b"abcd"), 0xa99eee66);
        assert_eq!(murmur3_32(b"hello"), 0x517325ac);
        assert_eq!(
            murmur3_32(b"The quick brown fox jumps over the lazy dog"),
            0x007045bb
        );
    }

    #[test]
    fn test_deterministic() {
        let key = b"user-42";
        assert_eq!(murmur3_32(key), murmur3_32(key));
        assert_eq!(murmur3_32(key), 0x7d2bc418);
    }

    #[test]
    fn test_single_bit_avalanche() {
        let mut rng = rand::thread_rng();
        let mut changed = 0;
        let trials = 1000;

        for _ in 0..trials {
            let len = rng.gen_range(1..64);
            let mut input = vec![0u8; len];
            rng.fill(&mut input[..]);

            let original = murmur3_32(&input);
            let bit = rng.gen_range(0..len * 8);
            input[bit / 8] ^= 1 << (bit % 8);

            if murmur3_32(&input) != original {
                changed += 1;
            }
        }

        assert!(changed >= trials * 99 / 100, "changed {changed}/{trials}");
    }
}

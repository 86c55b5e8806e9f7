//! Standard security handler support missing from `lopdf`.
//!
//! `lopdf` only checks a password against `/U`. An owner password is turned
//! back into the padded user password here (revisions 2 to 4) so the normal
//! decryption path can take it.

use lopdf::{Dictionary, Document as LopdfDocument, Object};
use md5::{Digest, Md5};

/// Password padding string of the standard security handler.
const PASSWORD_PAD: [u8; 32] = [
    0x28, 0xBF, 0x4E, 0x5E, 0x4E, 0x75, 0x8A, 0x41, 0x64, 0x00, 0x4E, 0x56, 0xFF, 0xFA, 0x01, 0x08,
    0x2E, 0x2E, 0x00, 0xB6, 0xD0, 0x68, 0x3E, 0x80, 0x2F, 0x0C, 0xA9, 0xFE, 0x64, 0x53, 0x69, 0x7A,
];

/// Truncate or pad a password to 32 bytes.
fn pad_password(password: &[u8]) -> [u8; 32] {
    let mut padded = PASSWORD_PAD;
    let len = password.len().min(32);
    padded[..len].copy_from_slice(&password[..len]);
    padded[len..].copy_from_slice(&PASSWORD_PAD[..32 - len]);
    padded
}

/// RC4 keystream applied to `data`. Encryption and decryption are the same.
fn rc4(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut s: [u8; 256] = std::array::from_fn(|i| i as u8);
    let mut j = 0u8;
    for i in 0..256 {
        j = j.wrapping_add(s[i]).wrapping_add(key[i % key.len()]);
        s.swap(i, j as usize);
    }

    let (mut i, mut j) = (0u8, 0u8);
    data.iter()
        .map(|&byte| {
            i = i.wrapping_add(1);
            j = j.wrapping_add(s[i as usize]);
            s.swap(i as usize, j as usize);
            byte ^ s[s[i as usize].wrapping_add(s[j as usize]) as usize]
        })
        .collect()
}

fn encrypt_dict(doc: &LopdfDocument) -> Option<&Dictionary> {
    match doc.trailer.get(b"Encrypt").ok()? {
        Object::Reference(id) => doc.get_dictionary(*id).ok(),
        Object::Dictionary(dict) => Some(dict),
        _ => None,
    }
}

/// Padded user password unlocked by `owner_password`.
///
/// `None` when the document has no RC4-based standard handler. The result
/// is only a candidate: `decrypt` still has to accept it.
pub(crate) fn user_password_from_owner(
    doc: &LopdfDocument,
    owner_password: &[u8],
) -> Option<Vec<u8>> {
    let encrypt = encrypt_dict(doc)?;
    let revision = encrypt.get(b"R").ok()?.as_i64().ok()?;
    if !(2..=4).contains(&revision) {
        return None;
    }
    let Object::String(owner_entry, _) = encrypt.get(b"O").ok()? else {
        return None;
    };

    let key_len = if revision == 2 {
        5
    } else {
        encrypt
            .get(b"Length")
            .ok()
            .and_then(|o| o.as_i64().ok())
            .map_or(5, |bits| (bits / 8).clamp(5, 16) as usize)
    };

    let mut hash = Md5::digest(pad_password(owner_password)).to_vec();
    if revision >= 3 {
        for _ in 0..50 {
            hash = Md5::digest(&hash[..key_len]).to_vec();
        }
    }
    let key = &hash[..key_len];

    if revision == 2 {
        return Some(rc4(key, owner_entry));
    }

    let mut user = owner_entry.clone();
    for round in (0..20u8).rev() {
        let round_key: Vec<u8> = key.iter().map(|b| b ^ round).collect();
        user = rc4(&round_key, &user);
    }
    Some(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::{dictionary, StringFormat};

    /// `/O` entry as a writer computes it.
    fn owner_entry(owner: &[u8], user: &[u8], revision: i64, key_len: usize) -> Vec<u8> {
        let mut hash = Md5::digest(pad_password(owner)).to_vec();
        if revision >= 3 {
            for _ in 0..50 {
                hash = Md5::digest(&hash[..key_len]).to_vec();
            }
        }
        let key = &hash[..key_len];

        let mut entry = rc4(key, &pad_password(user));
        if revision >= 3 {
            for round in 1..=19u8 {
                let round_key: Vec<u8> = key.iter().map(|b| b ^ round).collect();
                entry = rc4(&round_key, &entry);
            }
        }
        entry
    }

    fn document(revision: i64, bits: i64, owner_entry: Vec<u8>) -> LopdfDocument {
        let mut doc = LopdfDocument::with_version("1.5");
        let id = doc.add_object(dictionary! {
            "Filter" => "Standard",
            "V" => if revision == 2 { 1_i64 } else { 2_i64 },
            "R" => revision,
            "Length" => bits,
            "O" => Object::String(owner_entry, StringFormat::Literal),
        });
        doc.trailer.set("Encrypt", Object::Reference(id));
        doc
    }

    #[test]
    fn test_rc4_known_vector() {
        assert_eq!(
            rc4(b"Key", b"Plaintext"),
            vec![0xBB, 0xF3, 0x16, 0xE8, 0xD9, 0x40, 0xAF, 0x0A, 0xD3]
        );
    }

    #[test]
    fn test_pad_password() {
        assert_eq!(pad_password(b""), PASSWORD_PAD);
        let padded = pad_password(b"abc");
        assert_eq!(&padded[..3], b"abc");
        assert_eq!(&padded[3..], &PASSWORD_PAD[..29]);
        assert_eq!(pad_password(&[b'x'; 40]), [b'x'; 32]);
    }

    #[test]
    fn test_recovers_user_password_revision_2() {
        let doc = document(2, 40, owner_entry(b"owner", b"user", 2, 5));
        assert_eq!(
            user_password_from_owner(&doc, b"owner"),
            Some(pad_password(b"user").to_vec())
        );
    }

    #[test]
    fn test_recovers_user_password_revision_3() {
        let doc = document(3, 128, owner_entry(b"owner", b"user", 3, 16));
        assert_eq!(
            user_password_from_owner(&doc, b"owner"),
            Some(pad_password(b"user").to_vec())
        );
        assert_ne!(
            user_password_from_owner(&doc, b"other"),
            Some(pad_password(b"user").to_vec())
        );
    }

    #[test]
    fn test_unsupported_or_missing_handler() {
        assert_eq!(
            user_password_from_owner(&LopdfDocument::with_version("1.5"), b"owner"),
            None
        );
        let doc = document(6, 256, vec![0; 48]);
        assert_eq!(user_password_from_owner(&doc, b"owner"), None);
    }
}

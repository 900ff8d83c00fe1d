//! Random display characters drawn from two disjoint symbol sets.
//!
//! Half of the output is Hangul syllable blocks composed from a curated subset
//! of leading, vowel and trailing jamo; the other half is uppercase Cyrillic.

use rand::Rng;

/// First code point of the precomposed syllable block.
pub const SYLLABLE_BASE: u32 = 0xAC00;
/// Number of vowel jamo times number of trailing slots.
pub const MEDIAL_FINAL_SPAN: u32 = 588;
/// Number of trailing slots, including the empty one.
pub const FINAL_COUNT: u32 = 28;

const INITIAL_JAMO_BASE: u32 = 0x1100;
const MEDIAL_JAMO_BASE: u32 = 0x1161;
/// One below the first trailing jamo, so that U+11A8 maps to slot 1.
const FINAL_JAMO_BASE: u32 = 0x11A7;

const INITIALS: [u32; 14] = [
	0x1100, 0x1102, 0x1103, 0x1105, 0x1106, 0x1107, 0x1109, 0x110B, 0x110C, 0x110E, 0x110F,
	0x1110, 0x1111, 0x1112,
];
const MEDIALS: [u32; 9] = [
	0x1161, 0x1165, 0x1166, 0x1167, 0x1169, 0x116E, 0x1172, 0x1173, 0x1175,
];
/// `None` is the "no trailing consonant" choice.
const FINALS: [Option<u32>; 6] = [
	None,
	Some(0x11A8),
	Some(0x11AB),
	Some(0x11AF),
	Some(0x11B7),
	Some(0x11BA),
];

/// Uppercase Cyrillic letters used for the non-syllable half.
pub const CYRILLIC: [char; 27] = [
	'А', 'Б', 'В', 'Г', 'Д', 'Е', 'Ж', 'З', 'И', 'К', 'Л', 'М', 'Н', 'О', 'П', 'Р', 'С', 'Т',
	'У', 'Ф', 'Х', 'Ц', 'Ч', 'Ш', 'Э', 'Ю', 'Я',
];

/// Component indices of a precomposed syllable block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Syllable {
	/// Leading consonant index (0..19).
	pub initial: u32,
	/// Vowel index (0..21).
	pub medial: u32,
	/// Trailing consonant slot (0..28); 0 means no trailing consonant.
	pub final_index: u32,
}

impl Syllable {
	/// Builds a syllable from jamo code points. A missing final maps to slot 0.
	fn from_jamo(initial: u32, medial: u32, final_jamo: Option<u32>) -> Self {
		Self {
			initial: initial - INITIAL_JAMO_BASE,
			medial: medial - MEDIAL_JAMO_BASE,
			final_index: final_jamo.map_or(0, |jamo| jamo - FINAL_JAMO_BASE),
		}
	}

	/// Combines the indices into a single code point.
	pub fn compose(self) -> Option<char> {
		let code = SYLLABLE_BASE
			+ self.initial * MEDIAL_FINAL_SPAN
			+ self.medial * FINAL_COUNT
			+ self.final_index;
		char::from_u32(code)
	}

	/// Splits a precomposed syllable back into its component indices.
	/// Returns `None` for characters outside the syllable block.
	pub fn decompose(ch: char) -> Option<Self> {
		let offset = (ch as u32).checked_sub(SYLLABLE_BASE)?;
		let initial = offset / MEDIAL_FINAL_SPAN;
		if initial >= 19 {
			return None;
		}
		Some(Self {
			initial,
			medial: (offset % MEDIAL_FINAL_SPAN) / FINAL_COUNT,
			final_index: offset % FINAL_COUNT,
		})
	}
}

/// Produces random glyphs for particle textures.
#[derive(Clone, Debug)]
pub struct CharacterGenerator {
	/// Chance of emitting a syllable block instead of a Cyrillic letter.
	pub syllable_probability: f64,
}

impl Default for CharacterGenerator {
	fn default() -> Self {
		Self {
			syllable_probability: 0.5,
		}
	}
}

impl CharacterGenerator {
	/// Draws one character. Deterministic for a given RNG state.
	pub fn produce<R: Rng + ?Sized>(&self, rng: &mut R) -> char {
		if rng.gen_bool(self.syllable_probability) {
			let initial = INITIALS[rng.gen_range(0..INITIALS.len())];
			let medial = MEDIALS[rng.gen_range(0..MEDIALS.len())];
			let final_jamo = FINALS[rng.gen_range(0..FINALS.len())];
			// Every table entry is inside the block, so composing cannot fail.
			Syllable::from_jamo(initial, medial, final_jamo)
				.compose()
				.unwrap_or(CYRILLIC[0])
		} else {
			CYRILLIC[rng.gen_range(0..CYRILLIC.len())]
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	#[test]
	fn seeded_sequences_repeat() {
		let generator = CharacterGenerator::default();
		let mut a = StdRng::seed_from_u64(42);
		let mut b = StdRng::seed_from_u64(42);
		let first: Vec<char> = (0..64).map(|_| generator.produce(&mut a)).collect();
		let second: Vec<char> = (0..64).map(|_| generator.produce(&mut b)).collect();
		assert_eq!(first, second);
	}

	#[test]
	fn output_comes_from_one_of_the_two_sets() {
		let generator = CharacterGenerator::default();
		let mut rng = StdRng::seed_from_u64(7);
		let mut syllables = 0;
		for _ in 0..2000 {
			let ch = generator.produce(&mut rng);
			if let Some(syllable) = Syllable::decompose(ch) {
				syllables += 1;
				assert!(syllable.medial < 21);
				assert!(syllable.final_index < FINAL_COUNT);
				assert_eq!(syllable.compose(), Some(ch));
			} else {
				assert!(CYRILLIC.contains(&ch), "unexpected glyph {ch:?}");
			}
		}
		// Roughly half of the draws should be syllables.
		assert!((800..1200).contains(&syllables), "got {syllables}");
	}

	#[test]
	fn generated_syllables_use_only_curated_jamo() {
		let generator = CharacterGenerator {
			syllable_probability: 1.0,
		};
		let mut rng = StdRng::seed_from_u64(99);
		for _ in 0..500 {
			let syllable = Syllable::decompose(generator.produce(&mut rng)).unwrap();
			assert!(INITIALS.contains(&(syllable.initial + INITIAL_JAMO_BASE)));
			assert!(MEDIALS.contains(&(syllable.medial + MEDIAL_JAMO_BASE)));
			let final_jamo = (syllable.final_index != 0).then(|| syllable.final_index + FINAL_JAMO_BASE);
			assert!(FINALS.contains(&final_jamo));
		}
	}

	#[test]
	fn missing_final_contributes_nothing() {
		// 가: first initial, first medial, no final.
		let syllable = Syllable::from_jamo(0x1100, 0x1161, None);
		assert_eq!(syllable.final_index, 0);
		assert_eq!(syllable.compose(), Some('가'));

		// 하: ㅎ (index 18) + ㅏ (index 0), no final.
		let syllable = Syllable::from_jamo(0x1112, 0x1161, None);
		assert_eq!(syllable.compose(), Some('하'));
		assert_eq!(
			syllable.compose().map(u32::from),
			Some(SYLLABLE_BASE + 18 * MEDIAL_FINAL_SPAN)
		);
	}

	#[test]
	fn present_final_maps_to_its_slot() {
		// 각 = ㄱ + ㅏ + ㄱ (trailing slot 1)
		let syllable = Syllable::from_jamo(0x1100, 0x1161, Some(0x11A8));
		assert_eq!(syllable.final_index, 1);
		assert_eq!(syllable.compose(), Some('각'));

		// 한 = ㅎ + ㅏ + ㄴ (trailing slot 4)
		assert_eq!(
			Syllable::from_jamo(0x1112, 0x1161, Some(0x11AB)).compose(),
			Some('한')
		);
	}

	#[test]
	fn decompose_rejects_non_syllables() {
		assert_eq!(Syllable::decompose('Ж'), None);
		assert_eq!(Syllable::decompose('A'), None);
		assert_eq!(Syllable::decompose('\u{D7B0}'), None);
		assert_eq!(
			Syllable::decompose('\u{D7A3}'),
			Some(Syllable {
				initial: 18,
				medial: 20,
				final_index: 27
			})
		);
	}
}

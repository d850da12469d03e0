//! Random alignment and query generators for the randomized tests.
//! Not meant for real applications.
use rand::seq::SliceRandom;

#[derive(Debug, Clone, Copy)]
pub struct Profile {
    pub sub: f64,
    pub del: f64,
    pub ins: f64,
}

impl Profile {
    pub fn sum(&self) -> f64 {
        self.sub + self.del + self.ins
    }
    pub fn norm(&self) -> Self {
        let sum = self.sum();
        Self {
            sub: self.sub / sum,
            del: self.del / sum,
            ins: self.ins / sum,
        }
    }
}

pub const PROFILE: Profile = Profile {
    sub: 0.04,
    del: 0.04,
    ins: 0.07,
};

#[derive(Debug, Clone, Copy)]
enum Op {
    Match,
    MisMatch,
    Del,
    In,
}
impl Op {
    fn weight(self, p: &Profile) -> f64 {
        match self {
            Op::Match => 1. - p.sub - p.del - p.ins,
            Op::MisMatch => p.sub,
            Op::Del => p.del,
            Op::In => p.ins,
        }
    }
}
const OPERATIONS: [Op; 4] = [Op::Match, Op::MisMatch, Op::Del, Op::In];

/// Mutate `seq` according to the error profile. The result is ungapped and
/// may differ in length from the input.
pub fn introduce_randomness<T: rand::Rng>(seq: &[u8], rng: &mut T, p: &Profile) -> Vec<u8> {
    let mut res = vec![];
    let mut remainings: Vec<_> = seq.iter().copied().rev().collect();
    while !remainings.is_empty() {
        match *OPERATIONS.choose_weighted(rng, |e| e.weight(p)).unwrap() {
            Op::Match => res.push(remainings.pop().unwrap()),
            Op::MisMatch => res.push(choose_base(rng, remainings.pop().unwrap())),
            Op::In => res.push(random_base(rng)),
            Op::Del => {
                remainings.pop().unwrap();
            }
        }
    }
    res
}

/// One aligned row derived from `template`: same length, deletions become
/// gap characters, substitutions stay in place. No insertion columns, so a
/// set of such rows is a valid alignment of the template length.
pub fn gapped_row<T: rand::Rng>(template: &[u8], rng: &mut T, p: &Profile, gap: u8) -> Vec<u8> {
    template
        .iter()
        .map(|&base| {
            let x: f64 = rng.gen();
            if x < p.del {
                gap
            } else if x < p.del + p.sub {
                choose_base(rng, base)
            } else {
                base
            }
        })
        .collect()
}

pub fn generate_seq<T: rand::Rng>(rng: &mut T, len: usize) -> Vec<u8> {
    let bases = b"ACTG";
    (0..len)
        .filter_map(|_| bases.choose(rng))
        .copied()
        .collect()
}

fn choose_base<T: rand::Rng>(rng: &mut T, base: u8) -> u8 {
    let bases: Vec<u8> = b"ATCG".iter().filter(|&&e| e != base).copied().collect();
    *bases.choose_weighted(rng, |_| 1. / 3.).unwrap()
}
fn random_base<T: rand::Rng>(rng: &mut T) -> u8 {
    *b"ATGC".choose_weighted(rng, |_| 1. / 4.).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256StarStar;
    #[test]
    fn gapped_rows_keep_the_template_length() {
        let mut rng = Xoshiro256StarStar::seed_from_u64(42);
        let template = generate_seq(&mut rng, 200);
        for _ in 0..10 {
            let row = gapped_row(&template, &mut rng, &PROFILE, b'-');
            assert_eq!(row.len(), template.len());
            assert!(row.iter().all(|&x| b"ACGT-".contains(&x)));
        }
    }
}

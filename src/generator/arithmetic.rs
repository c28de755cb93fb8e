use rand::Rng;

pub const MIN_OPERAND: i64 = 1;
pub const MAX_OPERAND: i64 = 12;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Addition,
    Subtraction,
    Multiplication,
    Division,
}

impl Mode {
    pub const ALL: [Mode; 4] = [
        Mode::Addition,
        Mode::Subtraction,
        Mode::Multiplication,
        Mode::Division,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Mode::Addition => "Addition",
            Mode::Subtraction => "Subtraction",
            Mode::Multiplication => "Multiplication",
            Mode::Division => "Division",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Mode::Addition => "+",
            Mode::Subtraction => "-",
            Mode::Multiplication => "×",
            Mode::Division => "÷",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Problem {
    pub text: String,
    pub answer: i64,
}

impl Problem {
    /// Build the problem for two already-drawn operands.
    ///
    /// Subtraction puts the larger operand first so the result is never
    /// negative. Division shows `a * b ÷ b` so the quotient is always whole.
    pub fn from_operands(mode: Mode, a: i64, b: i64) -> Self {
        match mode {
            Mode::Addition => Self {
                text: format!("{a} + {b} = ?"),
                answer: a + b,
            },
            Mode::Subtraction => {
                let hi = a.max(b);
                let lo = a.min(b);
                Self {
                    text: format!("{hi} - {lo} = ?"),
                    answer: hi - lo,
                }
            }
            Mode::Multiplication => Self {
                text: format!("{a} × {b} = ?"),
                answer: a * b,
            },
            Mode::Division => {
                let product = a * b;
                Self {
                    text: format!("{product} ÷ {b} = ?"),
                    answer: a,
                }
            }
        }
    }
}

pub fn generate<R: Rng + ?Sized>(mode: Mode, rng: &mut R) -> Problem {
    let a = rng.gen_range(MIN_OPERAND..=MAX_OPERAND);
    let b = rng.gen_range(MIN_OPERAND..=MAX_OPERAND);
    Problem::from_operands(mode, a, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    /// Evaluate "x op y = ?" as displayed.
    fn evaluate(text: &str) -> i64 {
        let parts: Vec<&str> = text.split_whitespace().collect();
        assert_eq!(parts.len(), 5, "unexpected problem text: {text}");
        assert_eq!(parts[3], "=");
        assert_eq!(parts[4], "?");
        let x: i64 = parts[0].parse().unwrap();
        let y: i64 = parts[2].parse().unwrap();
        match parts[1] {
            "+" => x + y,
            "-" => x - y,
            "×" => x * y,
            "÷" => {
                assert_eq!(x % y, 0, "division must be exact: {text}");
                x / y
            }
            op => panic!("unknown operator {op}"),
        }
    }

    #[test]
    fn test_answer_matches_displayed_expression_for_all_operands() {
        for mode in Mode::ALL {
            for a in MIN_OPERAND..=MAX_OPERAND {
                for b in MIN_OPERAND..=MAX_OPERAND {
                    let problem = Problem::from_operands(mode, a, b);
                    assert_eq!(evaluate(&problem.text), problem.answer, "{problem:?}");
                }
            }
        }
    }

    #[test]
    fn test_subtraction_never_negative() {
        for a in MIN_OPERAND..=MAX_OPERAND {
            for b in MIN_OPERAND..=MAX_OPERAND {
                assert!(Problem::from_operands(Mode::Subtraction, a, b).answer >= 0);
            }
        }
    }

    #[test]
    fn test_addition_scenario() {
        let problem = Problem::from_operands(Mode::Addition, 3, 4);
        assert_eq!(problem.text, "3 + 4 = ?");
        assert_eq!(problem.answer, 7);
    }

    #[test]
    fn test_subtraction_orders_operands() {
        let problem = Problem::from_operands(Mode::Subtraction, 2, 9);
        assert_eq!(problem.text, "9 - 2 = ?");
        assert_eq!(problem.answer, 7);
    }

    #[test]
    fn test_division_shows_product_and_second_operand() {
        let problem = Problem::from_operands(Mode::Division, 4, 6);
        assert_eq!(problem.text, "24 ÷ 6 = ?");
        assert_eq!(problem.answer, 4);
        assert_eq!(problem.answer * 6, 24);
    }

    #[test]
    fn test_generate_operands_stay_in_range() {
        let mut rng = SmallRng::seed_from_u64(42);
        for _ in 0..500 {
            let problem = generate(Mode::Multiplication, &mut rng);
            let parts: Vec<&str> = problem.text.split_whitespace().collect();
            let x: i64 = parts[0].parse().unwrap();
            let y: i64 = parts[2].parse().unwrap();
            assert!((MIN_OPERAND..=MAX_OPERAND).contains(&x));
            assert!((MIN_OPERAND..=MAX_OPERAND).contains(&y));
        }
    }

    #[test]
    fn test_generate_is_reproducible_with_same_seed() {
        let mut first = SmallRng::seed_from_u64(7);
        let mut second = SmallRng::seed_from_u64(7);
        for mode in Mode::ALL {
            assert_eq!(generate(mode, &mut first), generate(mode, &mut second));
        }
    }
}

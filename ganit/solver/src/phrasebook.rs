//! Fixed narration strings for every solver, per language.

use crate::topic::Language;

/// Labels and sentences used when narrating steps.
#[derive(Debug)]
pub struct Phrasebook {
    /// "Vector 1".
    pub vector_first: &'static str,
    /// "Vector 2".
    pub vector_second: &'static str,
    /// "Vector A".
    pub vector_a: &'static str,
    /// "Vector B".
    pub vector_b: &'static str,
    /// Dot product formula line.
    pub dot_formula: &'static str,
    /// Cross product formula line.
    pub cross_formula: &'static str,
    /// "Calculation".
    pub calculation: &'static str,
    /// "Result".
    pub result: &'static str,
    /// "Dot product".
    pub dot_product: &'static str,
    /// "Cross product".
    pub cross_product: &'static str,
    /// Vector failure answer.
    pub vector_failed_answer: &'static str,
    /// Vector failure step.
    pub vector_failed_step: &'static str,
    /// "Function".
    pub function: &'static str,
    /// Differentiation rule line.
    pub derivative_rule: &'static str,
    /// Per-term differentiation instruction.
    pub derivative_per_term: &'static str,
    /// "Answer".
    pub answer: &'static str,
    /// Derivative failure answer.
    pub derivative_failed_answer: &'static str,
    /// Derivative failure step.
    pub derivative_failed_step: &'static str,
    /// "Integral".
    pub integral: &'static str,
    /// Integration rule line.
    pub integral_rule: &'static str,
    /// Per-term integration instruction.
    pub integral_per_term: &'static str,
    /// Integral failure answer.
    pub integral_failed_answer: &'static str,
    /// Integral failure step.
    pub integral_failed_step: &'static str,
    /// "Matrix A".
    pub matrix: &'static str,
    /// 2x2 determinant rule line.
    pub determinant_rule: &'static str,
    /// Answer when the matrix request names no supported operation.
    pub matrix_help_answer: &'static str,
    /// Answer for topics without a strategy.
    pub unsupported_answer: &'static str,
    /// Step for topics without a strategy.
    pub unsupported_step: &'static str,
}

/// English narration.
pub const ENGLISH: Phrasebook = Phrasebook {
    vector_first: "Vector 1",
    vector_second: "Vector 2",
    vector_a: "Vector A",
    vector_b: "Vector B",
    dot_formula: "Dot product formula: A·B = Σ(aᵢ × bᵢ)",
    cross_formula: "Cross product formula: A × B = det[[i,j,k],[a₁,a₂,a₃],[b₁,b₂,b₃]]",
    calculation: "Calculation",
    result: "Result",
    dot_product: "Dot product",
    cross_product: "Cross product",
    vector_failed_answer: "Could not solve the vector problem",
    vector_failed_step: "Sorry, this vector problem could not be solved",
    function: "Function",
    derivative_rule: "Apply the power rule: d/dx(xⁿ) = n·xⁿ⁻¹",
    derivative_per_term: "Differentiate each term separately",
    answer: "Answer",
    derivative_failed_answer: "Could not compute the derivative",
    derivative_failed_step: "Sorry, this derivative problem could not be solved",
    integral: "Integral",
    integral_rule: "Apply the power rule: ∫xⁿ dx = xⁿ⁺¹/(n+1) + C",
    integral_per_term: "Integrate each term separately",
    integral_failed_answer: "Could not compute the integral",
    integral_failed_step: "There was a problem solving the integral",
    matrix: "Matrix A",
    determinant_rule: "Determinant of a 2×2 matrix: det([[a,b],[c,d]]) = ad - bc",
    matrix_help_answer: "This matrix problem needs more help",
    unsupported_answer: "This kind of problem is not supported yet",
    unsupported_step: "Sorry, this kind of problem cannot be solved yet",
};

/// Bengali narration.
pub const BENGALI: Phrasebook = Phrasebook {
    vector_first: "ভেক্টর ১",
    vector_second: "ভেক্টর ২",
    vector_a: "ভেক্টর A",
    vector_b: "ভেক্টর B",
    dot_formula: "ডট প্রোডাক্ট সূত্র: A·B = Σ(aᵢ × bᵢ)",
    cross_formula: "ক্রস প্রোডাক্ট সূত্র: A × B = det[[i,j,k],[a₁,a₂,a₃],[b₁,b₂,b₃]]",
    calculation: "গণনা",
    result: "ফলাফল",
    dot_product: "ডট প্রোডাক্ট",
    cross_product: "ক্রস প্রোডাক্ট",
    vector_failed_answer: "ভেক্টর সমস্যা সমাধান করতে ব্যর্থ",
    vector_failed_step: "দুঃখিত, এই ভেক্টর সমস্যাটি সমাধান করতে পারিনি",
    function: "ফাংশন",
    derivative_rule: "পাওয়ার রুল প্রয়োগ: d/dx(xⁿ) = n·xⁿ⁻¹",
    derivative_per_term: "প্রতিটি টার্ম আলাদা করে ডিফারেনশিয়েট করুন",
    answer: "উত্তর",
    derivative_failed_answer: "ডেরিভেটিভ গণনা করতে ব্যর্থ",
    derivative_failed_step: "দুঃখিত, এই ডেরিভেটিভ সমস্যাটি সমাধান করতে পারিনি",
    integral: "ইন্টিগ্রাল",
    integral_rule: "পাওয়ার নিয়ম প্রয়োগ: ∫xⁿ dx = xⁿ⁺¹/(n+1) + C",
    integral_per_term: "প্রতিটি টার্ম আলাদা করে ইন্টিগ্রেট করুন",
    integral_failed_answer: "ইন্টিগ্রাল গণনা করতে ব্যর্থ",
    integral_failed_step: "ইন্টিগ্রাল সমস্যা সমাধানে সমস্যা হচ্ছে",
    matrix: "ম্যাট্রিক্স A",
    determinant_rule: "২×২ ম্যাট্রিক্সের ডিটারমিনেন্ট: det([[a,b],[c,d]]) = ad - bc",
    matrix_help_answer: "ম্যাট্রিক্স সমস্যা সমাধানে সহায়তা প্রয়োজন",
    unsupported_answer: "এই ধরনের সমস্যা এখনও সমর্থিত নয়",
    unsupported_step: "দুঃখিত, এই ধরনের সমস্যা এখনও সমাধান করা যায় না",
};

impl Phrasebook {
    /// Phrasebook for `language`.
    #[must_use]
    pub fn for_language(language: Language) -> &'static Self {
        match language {
            Language::En => &ENGLISH,
            Language::Bn => &BENGALI,
        }
    }

    /// `"{label}: {value}"`.
    #[must_use]
    pub fn line(label: &str, value: impl std::fmt::Display) -> String {
        format!("{label}: {value}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_book_by_language() {
        assert_eq!(Phrasebook::for_language(Language::En).result, "Result");
        assert_eq!(Phrasebook::for_language(Language::Bn).result, "ফলাফল");
        assert_eq!(Phrasebook::line("Result", 32), "Result: 32");
    }
}

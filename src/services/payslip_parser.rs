// src/services/payslip_parser.rs

//! Extração heurística de campos a partir do texto do OCR de um holerite.
//!
//! Cada campo tem uma lista ordenada de regras; a primeira que casa vence.
//! Os campos são independentes: extração parcial é o caso normal.

use regex::Regex;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::{common::numeric::parse_amount, models::payslip::ExtractedPayslip};

/// Valores acima disso (em rúpias) são tratados como erro de leitura.
pub const SANITY_CEILING: Decimal = dec!(1000000);

// Valor monetário com prefixo opcional de moeda
const AMOUNT: &str = r"(?:Rs\.?|INR|₹)?\s*([0-9][0-9,]*(?:\.[0-9]+)?)";

// Palavras que encerram um nome capturado depois de "Name:"
const NAME_STOP_WORDS: &[&str] = &[
    "employee", "emp", "designation", "department", "dept", "date", "month", "pay", "pan",
    "uan", "code", "id", "no", "location", "bank", "gender", "doj", "grade", "period",
    "company", "employer", "days", "total", "basic",
];

// Prefixos que indicam que o "Name:" não é o do funcionário
const FOREIGN_NAME_PREFIXES: &[&str] = &["company", "employer", "bank", "branch", "father's", "fathers", "father"];

// Finais de rótulos compostos ("Father's Name:", "Emp Code:"): a palavra anterior também é rótulo
const LABEL_TAILS: &[&str] = &["name", "no", "code", "id", "number"];

const DEFAULT_EMPLOYERS: &[&str] = &[
    "Infosys",
    "Tata Consultancy Services",
    "Wipro",
    "HCL Technologies",
    "Tech Mahindra",
    "Accenture",
    "Cognizant",
];

type Extractor<T> = Box<dyn Fn(&str) -> Option<T> + Send + Sync>;

/// Uma regra de extração: um nome (para log e testes) e a função que tenta casar.
pub struct Rule<T> {
    pub name: String,
    extract: Extractor<T>,
}

impl<T: 'static> Rule<T> {
    pub fn new<F>(name: impl Into<String>, extract: F) -> Self
    where
        F: Fn(&str) -> Option<T> + Send + Sync + 'static,
    {
        Self { name: name.into(), extract: Box::new(extract) }
    }

    /// Regra baseada no primeiro grupo de captura de uma regex.
    pub fn captured(
        name: impl Into<String>,
        pattern: &str,
        convert: fn(&str) -> Option<T>,
    ) -> Result<Self, regex::Error> {
        let re = Regex::new(pattern)?;
        Ok(Self::new(name, move |text| {
            re.captures(text)
                .and_then(|caps| caps.get(1))
                .and_then(|m| convert(m.as_str()))
        }))
    }

    pub fn apply(&self, text: &str) -> Option<T> {
        (self.extract)(text)
    }
}

/// As regras de um campo, em ordem de prioridade.
pub struct FieldRules<T> {
    field: &'static str,
    rules: Vec<Rule<T>>,
}

impl<T: 'static> FieldRules<T> {
    pub fn new(field: &'static str, rules: Vec<Rule<T>>) -> Self {
        Self { field, rules }
    }

    pub fn first_match(&self, text: &str) -> Option<T> {
        self.rules.iter().find_map(|rule| {
            let value = rule.apply(text)?;
            tracing::debug!(field = self.field, rule = %rule.name, "regra de extração casou");
            Some(value)
        })
    }

    #[cfg(test)]
    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name.as_str()).collect()
    }
}

// =========================================================================
//  Registro de empregadores conhecidos
// =========================================================================

pub struct EmployerSignature {
    pub name: String,
    pattern: Regex,
}

impl EmployerSignature {
    /// Casa o nome inteiro, sem diferenciar maiúsculas e tolerando espaços extras.
    pub fn new(name: &str) -> Result<Self, regex::Error> {
        let words: Vec<String> = name.split_whitespace().map(regex::escape).collect();
        let pattern = Regex::new(&format!(r"(?i)\b{}\b", words.join(r"\s+")))?;
        Ok(Self { name: words_to_name(name), pattern })
    }

    pub fn matches(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}

fn words_to_name(name: &str) -> String {
    name.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[derive(Default)]
pub struct EmployerRegistry {
    signatures: Vec<EmployerSignature>,
}

impl EmployerRegistry {
    pub fn with_defaults() -> Result<Self, regex::Error> {
        let mut registry = Self::default();
        for name in DEFAULT_EMPLOYERS {
            registry.register(name)?;
        }
        Ok(registry)
    }

    pub fn register(&mut self, name: &str) -> Result<(), regex::Error> {
        if name.trim().is_empty() {
            return Ok(());
        }
        self.signatures.push(EmployerSignature::new(name)?);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    fn into_rules(self) -> Vec<Rule<String>> {
        self.signatures
            .into_iter()
            .map(|sig| {
                let rule_name = format!("signature:{}", sig.name);
                Rule::new(rule_name, move |text| sig.matches(text).then(|| sig.name.clone()))
            })
            .collect()
    }
}

// =========================================================================
//  O parser
// =========================================================================

pub struct PayslipParser {
    employer: FieldRules<String>,
    name: FieldRules<String>,
    date: FieldRules<String>,
    income: FieldRules<Decimal>,
    deductions: FieldRules<Decimal>,
    net_pay: FieldRules<Decimal>,
}

impl PayslipParser {
    pub fn new(registry: EmployerRegistry) -> Result<Self, regex::Error> {
        // --- Empregador: assinaturas conhecidas, depois o rótulo ---
        let mut employer_rules = registry.into_rules();
        let label_re = Regex::new(
            r"(?i)\b(?:employer|company)(?:\s+name)?\s*:\s*([A-Za-z0-9&.'\-]+(?:\s+[A-Za-z0-9&.'\-]+){0,5})",
        )?;
        employer_rules.push(Rule::new("employer_label", move |text| {
            let caps = label_re.captures(text)?;
            cut_at_stop_words(caps.get(1)?.as_str(), &["employee", "name", "pay", "payslip", "month", "date", "address"])
        }));

        // --- Nome do funcionário ---
        let name_label_re = Regex::new(r"(?i)(\S+\s+)?\bname\s*:\s*")?;
        let tabular_re = Regex::new(r"(?i)\bemployee\s+name\s+")?;
        let name_rules = vec![
            Rule::new("name_label", move |text| {
                name_label_re.captures_iter(text).find_map(|caps| {
                    let prefix = caps
                        .get(1)
                        .map(|m| m.as_str().trim().to_lowercase())
                        .unwrap_or_default();
                    if FOREIGN_NAME_PREFIXES.contains(&prefix.as_str()) {
                        return None;
                    }
                    let rest = &text[caps.get(0)?.end()..];
                    cut_at_stop_words(&leading_words(rest), NAME_STOP_WORDS)
                })
            }),
            // Layout tabular: "Employee Name Ravi Kumar" sem dois-pontos
            Rule::new("name_tabular", move |text| {
                let label = tabular_re.find(text)?;
                cut_at_stop_words(&leading_words(&text[label.end()..]), NAME_STOP_WORDS)
            }),
        ];

        // --- Data ---
        let date_rules = vec![
            Rule::captured(
                "date_month_name",
                r"(?i)\b((?:january|february|march|april|may|june|july|august|september|october|november|december)\s+\d{4})\b",
                to_owned_text,
            )?,
            Rule::captured("date_numeric", r"\b(\d{1,2}[/\-.]\d{1,2}[/\-.]\d{2,4})\b", to_owned_text)?,
        ];

        // --- Rendimento: total explícito, depois soma das verbas ---
        let line_items = vec![
            Regex::new(&format!(r"(?i)\bbasic(?:\s+(?:pay|salary))?\s*[:\-]?\s*{AMOUNT}"))?,
            Regex::new(&format!(r"(?i)\b(?:house\s+rent\s+allowance|hra)\s*[:\-]?\s*{AMOUNT}"))?,
            Regex::new(&format!(r"(?i)\bconveyance(?:\s+allowance)?\s*[:\-]?\s*{AMOUNT}"))?,
            Regex::new(&format!(r"(?i)\bspecial\s+allowance\s*[:\-]?\s*{AMOUNT}"))?,
            Regex::new(&format!(r"(?i)\bmedical\s+allowance\s*[:\-]?\s*{AMOUNT}"))?,
        ];
        let income_rules = vec![
            Rule::captured(
                "total_earnings",
                &format!(r"(?i)\btotal\s+earnings?\s*[:\-]?\s*{AMOUNT}"),
                to_amount,
            )?,
            Rule::captured(
                "gross_earnings",
                &format!(r"(?i)\bgross\s+(?:earnings|salary|pay)\s*[:\-]?\s*{AMOUNT}"),
                to_amount,
            )?,
            Rule::new("line_item_sum", move |text| sum_line_items(&line_items, text)),
        ];

        let deduction_rules = vec![Rule::captured(
            "total_deductions",
            &format!(r"(?i)\btotal\s+deductions?\s*[:\-]?\s*{AMOUNT}"),
            to_amount,
        )?];

        let net_pay_rules = vec![
            Rule::captured(
                "net_pay",
                &format!(r"(?i)\bnet\s+(?:pay|salary)(?:\s+payable)?\s*[:\-]?\s*{AMOUNT}"),
                to_amount,
            )?,
            Rule::captured(
                "take_home",
                &format!(r"(?i)\btake\s+home(?:\s+pay)?\s*[:\-]?\s*{AMOUNT}"),
                to_amount,
            )?,
        ];

        Ok(Self {
            employer: FieldRules::new("employer", employer_rules),
            name: FieldRules::new("name", name_rules),
            date: FieldRules::new("date", date_rules),
            income: FieldRules::new("income", income_rules),
            deductions: FieldRules::new("deductions", deduction_rules),
            net_pay: FieldRules::new("net_pay", net_pay_rules),
        })
    }

    pub fn with_defaults() -> Result<Self, regex::Error> {
        Self::new(EmployerRegistry::with_defaults()?)
    }

    /// Extrai o que der. Nunca falha; campos não encontrados ficam `None`.
    pub fn parse(&self, raw_text: &str) -> ExtractedPayslip {
        let text = collapse_whitespace(raw_text);

        ExtractedPayslip {
            name: self.name.first_match(&text),
            income: sanitize("income", self.income.first_match(&text)),
            employer: self.employer.first_match(&text),
            date: self.date.first_match(&text),
            deductions: sanitize("deductions", self.deductions.first_match(&text)),
            net_pay: sanitize("net_pay", self.net_pay.first_match(&text)),
        }
    }
}

/// Todas as sequências de espaço em branco viram um único espaço.
pub fn collapse_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Descarta valores fora do teto de sanidade (provável leitura errada).
pub fn sanitize(field: &str, value: Option<Decimal>) -> Option<Decimal> {
    match value {
        Some(v) if v.abs() > SANITY_CEILING => {
            tracing::warn!(field, value = %v, "valor acima do teto descartado");
            None
        }
        other => other,
    }
}

// Estrita: um número que não cabe em Decimal não vira zero, vira ausência
fn to_amount(raw: &str) -> Option<Decimal> {
    parse_amount(raw)
}

fn to_owned_text(raw: &str) -> Option<String> {
    Some(raw.trim().to_string())
}

fn sum_line_items(items: &[Regex], text: &str) -> Option<Decimal> {
    let found: Vec<Decimal> = items
        .iter()
        .filter_map(|re| re.captures(text))
        .filter_map(|caps| caps.get(1).and_then(|m| parse_amount(m.as_str())))
        .collect();

    if found.is_empty() {
        None
    } else {
        Some(found.into_iter().sum())
    }
}

// Até cinco palavras só de letras logo depois de um rótulo. Para no próximo
// rótulo ("Xyz:"); se ele for composto ("Father's Name:"), descarta a primeira parte.
fn leading_words(rest: &str) -> String {
    let mut kept: Vec<&str> = Vec::new();

    for word in rest.split_whitespace() {
        if let Some(label) = word.strip_suffix(':') {
            if LABEL_TAILS.contains(&label.to_lowercase().as_str()) {
                kept.pop();
            }
            break;
        }
        let bare = word.trim_end_matches(',');
        let is_word = bare.chars().next().is_some_and(|c| c.is_alphabetic())
            && bare.chars().all(|c| c.is_alphabetic() || c == '.' || c == '\'');
        if !is_word {
            break;
        }
        kept.push(word);
    }

    kept.truncate(5);
    kept.join(" ")
}

fn cut_at_stop_words(captured: &str, stop_words: &[&str]) -> Option<String> {
    let kept: Vec<&str> = captured
        .split_whitespace()
        .take_while(|word| {
            let bare = word.trim_end_matches([':', '.', ',']).to_lowercase();
            !stop_words.contains(&bare.as_str())
        })
        .collect();

    if kept.is_empty() {
        None
    } else {
        Some(kept.join(" "))
    }
}

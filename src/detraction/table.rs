//! Detraction rule table (annexes 1–3 of the SPOT regime).
//!
//! Shipped with the crate; changing a rate means releasing a new version.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

/// Whether a detraction category covers goods or services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DetractionCategory {
    Goods,
    Services,
}

/// One row of the detraction table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DetractionRule {
    /// Catalogue 54 code, e.g. "027".
    pub code: &'static str,
    pub name: &'static str,
    /// Withholding rate in percent.
    pub rate_percent: Decimal,
    pub category: DetractionCategory,
    /// Category-specific threshold on top of the global minimum.
    pub minimum_amount: Option<Decimal>,
}

const fn goods(code: &'static str, name: &'static str, rate_percent: Decimal) -> DetractionRule {
    DetractionRule {
        code,
        name,
        rate_percent,
        category: DetractionCategory::Goods,
        minimum_amount: None,
    }
}

const fn services(code: &'static str, name: &'static str, rate_percent: Decimal) -> DetractionRule {
    DetractionRule {
        code,
        name,
        rate_percent,
        category: DetractionCategory::Services,
        minimum_amount: None,
    }
}

static DETRACTION_TABLE: &[DetractionRule] = &[
    goods("001", "Azúcar y melaza de caña", dec!(10)),
    goods("003", "Alcohol etílico", dec!(10)),
    goods("004", "Recursos hidrobiológicos", dec!(4)),
    goods("005", "Maíz amarillo duro", dec!(4)),
    goods("007", "Caña de azúcar", dec!(10)),
    goods("008", "Madera", dec!(4)),
    goods("009", "Arena y piedra", dec!(10)),
    goods("010", "Residuos, subproductos, desechos, recortes y desperdicios", dec!(15)),
    goods("011", "Bienes gravados con el IGV por renuncia a la exoneración", dec!(10)),
    services("012", "Intermediación laboral y tercerización", dec!(12)),
    goods("014", "Carnes y despojos comestibles", dec!(4)),
    goods("016", "Aceite de pescado", dec!(10)),
    goods("017", "Harina, polvo y pellets de pescado, crustáceos, moluscos y demás invertebrados acuáticos", dec!(4)),
    services("019", "Arrendamiento de bienes", dec!(10)),
    services("020", "Mantenimiento y reparación de bienes muebles", dec!(12)),
    services("021", "Movimiento de carga", dec!(10)),
    services("022", "Otros servicios empresariales", dec!(12)),
    goods("023", "Leche", dec!(4)),
    services("024", "Comisión mercantil", dec!(10)),
    services("025", "Fabricación de bienes por encargo", dec!(10)),
    services("026", "Servicio de transporte de personas", dec!(10)),
    DetractionRule {
        code: "027",
        name: "Servicio de transporte de bienes",
        rate_percent: dec!(4),
        category: DetractionCategory::Services,
        minimum_amount: Some(dec!(400)),
    },
    services("030", "Contratos de construcción", dec!(4)),
    goods("031", "Oro gravado con el IGV", dec!(10)),
    goods("034", "Minerales metálicos no auríferos", dec!(10)),
    goods("035", "Bienes exonerados del IGV", dec!(1.5)),
    goods("036", "Oro y demás minerales metálicos exonerados del IGV", dec!(1.5)),
    services("037", "Demás servicios gravados con el IGV", dec!(12)),
    goods("039", "Minerales no metálicos", dec!(10)),
    goods("040", "Bien inmueble gravado con IGV", dec!(4)),
    goods("041", "Plomo", dec!(15)),
];

/// All known detraction rules, ordered by code.
pub fn detraction_rules() -> &'static [DetractionRule] {
    DETRACTION_TABLE
}

/// Look up a rule by its catalogue code. Surrounding whitespace is ignored.
pub fn find_detraction_rule(code: &str) -> Option<&'static DetractionRule> {
    let code = code.trim();
    DETRACTION_TABLE.iter().find(|r| r.code == code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_unique_and_sorted() {
        let codes: Vec<&str> = detraction_rules().iter().map(|r| r.code).collect();
        let mut sorted = codes.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(codes, sorted);
        assert!(codes.len() >= 25);
    }

    #[test]
    fn rates_are_percentages() {
        for rule in detraction_rules() {
            assert!(rule.rate_percent > Decimal::ZERO, "{}", rule.code);
            assert!(rule.rate_percent < dec!(100), "{}", rule.code);
        }
    }

    #[test]
    fn freight_transport_has_own_minimum() {
        let rule = find_detraction_rule("027").unwrap();
        assert_eq!(rule.category, DetractionCategory::Services);
        assert_eq!(rule.minimum_amount, Some(dec!(400)));
    }

    #[test]
    fn lookup_trims_and_misses() {
        assert_eq!(find_detraction_rule(" 019 ").unwrap().rate_percent, dec!(10));
        assert!(find_detraction_rule("999").is_none());
        assert!(find_detraction_rule("").is_none());
    }
}

//! Utilidades de validación y normalización
//!
//! Este módulo contiene las funciones de canonicalización de
//! identificadores (CPF/CNPJ, matrícula, teléfono) que se aplican
//! antes de cualquier lookup o escritura, para que diferencias de
//! formato nunca produzcan filas duplicadas.

/// Normalizar CPF/CNPJ a solo dígitos
pub fn normalize_tax_id(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Verificar que un CPF/CNPJ normalizado tenga 11 o 14 dígitos
pub fn is_valid_tax_id(normalized: &str) -> bool {
    matches!(normalized.len(), 11 | 14)
}

/// Normalizar matrícula: mayúsculas, sin guiones ni espacios
pub fn normalize_plate(raw: &str) -> String {
    raw.trim()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_uppercase()
}

/// Normalizar teléfono a solo dígitos (formato local de 10/11 dígitos)
pub fn normalize_phone(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Email sintético para clientes de autoservicio sin email real.
/// Mantiene satisfacible la constraint de unicidad de email.
pub fn placeholder_email(phone: &str) -> String {
    format!("{}@auto.fake", normalize_phone(phone))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_tax_id() {
        // CPF formateado y crudo resuelven al mismo valor
        assert_eq!(normalize_tax_id("123.456.789-09"), "12345678909");
        assert_eq!(normalize_tax_id("12345678909"), "12345678909");
        // CNPJ
        assert_eq!(normalize_tax_id("12.345.678/0001-95"), "12345678000195");
    }

    #[test]
    fn test_normalize_tax_id_idempotente() {
        let once = normalize_tax_id("123.456.789-09");
        assert_eq!(normalize_tax_id(&once), once);
    }

    #[test]
    fn test_is_valid_tax_id() {
        assert!(is_valid_tax_id("12345678909"));
        assert!(is_valid_tax_id("12345678000195"));
        assert!(!is_valid_tax_id("123"));
        assert!(!is_valid_tax_id(""));
    }

    #[test]
    fn test_normalize_plate() {
        assert_eq!(normalize_plate("abc-1234"), "ABC1234");
        assert_eq!(normalize_plate("ABC1234"), "ABC1234");
        assert_eq!(normalize_plate(" abc 1d23 "), "ABC1D23");
    }

    #[test]
    fn test_normalize_phone() {
        assert_eq!(normalize_phone("(11) 98765-4321"), "11987654321");
        assert_eq!(normalize_phone("11987654321"), "11987654321");
    }

    #[test]
    fn test_placeholder_email() {
        assert_eq!(placeholder_email("(11) 98765-4321"), "11987654321@auto.fake");
    }
}

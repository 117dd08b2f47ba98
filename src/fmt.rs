/// Significant digits kept when rendering a float for the MileIQ sheet.
const SIGNIFICANT_DIGITS: i32 = 12;

/// Render a float the way the legacy converter did: 12 significant digits,
/// `%g` notation rules, trailing zeros dropped and `.0` kept on integral values.
///
/// `5.3500000000000005` becomes `5.35`, `100.0` stays `100.0`, and tiny or
/// huge values switch to exponent form (`5.35e-06`, `5.35e+29`).
pub fn float_str(val: f64) -> String {
    if val.is_nan() {
        return "nan".to_string();
    }
    if val.is_infinite() {
        return if val > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if val == 0.0 {
        return if val.is_sign_negative() { "-0.0" } else { "0.0" }.to_string();
    }

    // Rounded to the digit budget first so the exponent reflects any carry (9.99..e4 -> 1e5).
    let sci = format!("{:.*e}", (SIGNIFICANT_DIGITS - 1) as usize, val);
    let Some((mantissa, exp)) = sci.split_once('e') else {
        return sci;
    };
    let exp: i32 = exp.parse().unwrap_or(0);
    let sign = if mantissa.starts_with('-') { "-" } else { "" };
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    let digits = digits.trim_end_matches('0');
    let digits = if digits.is_empty() { "0" } else { digits };

    if (-4..SIGNIFICANT_DIGITS).contains(&exp) {
        let int_len = exp + 1;
        if int_len <= 0 {
            let zeros = "0".repeat(int_len.unsigned_abs() as usize);
            format!("{sign}0.{zeros}{digits}")
        } else {
            let int_len = int_len as usize;
            if int_len >= digits.len() {
                let zeros = "0".repeat(int_len - digits.len());
                format!("{sign}{digits}{zeros}.0")
            } else {
                format!("{sign}{}.{}", &digits[..int_len], &digits[int_len..])
            }
        }
    } else {
        let mantissa = if digits.len() > 1 {
            format!("{}.{}", &digits[..1], &digits[1..])
        } else {
            digits.to_string()
        };
        let exp_sign = if exp < 0 { '-' } else { '+' };
        format!("{sign}{mantissa}e{exp_sign}{:02}", exp.unsigned_abs())
    }
}

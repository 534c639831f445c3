use super::check_arity;
use crate::error::XPath31Error;
use crate::types::XdmValue;

pub fn fn_count(args: Vec<XdmValue>) -> Result<XdmValue, XPath31Error> {
    check_arity("count", &args, 1, 1)?;
    Ok(XdmValue::from_integer(args[0].len() as i64))
}

pub fn fn_empty(args: Vec<XdmValue>) -> Result<XdmValue, XPath31Error> {
    check_arity("empty", &args, 1, 1)?;
    Ok(XdmValue::from_bool(args[0].is_empty()))
}

pub fn fn_exists(args: Vec<XdmValue>) -> Result<XdmValue, XPath31Error> {
    check_arity("exists", &args, 1, 1)?;
    Ok(XdmValue::from_bool(!args[0].is_empty()))
}

pub fn fn_head(args: Vec<XdmValue>) -> Result<XdmValue, XPath31Error> {
    check_arity("head", &args, 1, 1)?;
    Ok(args[0]
        .first()
        .cloned()
        .map(XdmValue::from_item)
        .unwrap_or_default())
}

pub fn fn_reverse(mut args: Vec<XdmValue>) -> Result<XdmValue, XPath31Error> {
    check_arity("reverse", &args, 1, 1)?;
    let mut items = args.remove(0).into_items();
    items.reverse();
    Ok(XdmValue::from_items(items))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ints(values: &[i64]) -> XdmValue {
        XdmValue::from_atomics(values.iter().map(|i| (*i).into()).collect())
    }

    #[test]
    fn test_count_and_existence() {
        assert_eq!(fn_count(vec![ints(&[1, 2, 3])]).unwrap(), XdmValue::from_integer(3));
        assert_eq!(fn_empty(vec![ints(&[])]).unwrap(), XdmValue::from_bool(true));
        assert_eq!(fn_exists(vec![ints(&[1])]).unwrap(), XdmValue::from_bool(true));
    }

    #[test]
    fn test_head_and_reverse() {
        assert_eq!(fn_head(vec![ints(&[4, 5])]).unwrap(), ints(&[4]));
        assert!(fn_head(vec![ints(&[])]).unwrap().is_empty());
        assert_eq!(fn_reverse(vec![ints(&[1, 2, 3])]).unwrap(), ints(&[3, 2, 1]));
    }
}

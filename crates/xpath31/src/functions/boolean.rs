use super::check_arity;
use crate::error::XPath31Error;
use crate::types::XdmValue;

pub fn fn_true(args: Vec<XdmValue>) -> Result<XdmValue, XPath31Error> {
    check_arity("true", &args, 0, 0)?;
    Ok(XdmValue::from_bool(true))
}

pub fn fn_false(args: Vec<XdmValue>) -> Result<XdmValue, XPath31Error> {
    check_arity("false", &args, 0, 0)?;
    Ok(XdmValue::from_bool(false))
}

pub fn fn_not(args: Vec<XdmValue>) -> Result<XdmValue, XPath31Error> {
    check_arity("not", &args, 1, 1)?;
    Ok(XdmValue::from_bool(!args[0].effective_boolean_value()?))
}

pub fn fn_boolean(args: Vec<XdmValue>) -> Result<XdmValue, XPath31Error> {
    check_arity("boolean", &args, 1, 1)?;
    Ok(XdmValue::from_bool(args[0].effective_boolean_value()?))
}

use crate::{Arguments, FormatError, Template};

/// Hook between the generator and the templates.
///
/// Each method renders one kind of fragment from its template and the arguments the
/// generator computed. Override a method to add bindings or post-process the text; the
/// defaults substitute placeholders and nothing else.
pub trait CodeFormatter {
    /// Renders the root template, with every fragment block already bound.
    fn format(&self, template: &Template, arguments: &Arguments) -> Result<String, FormatError> {
        template.format(arguments)
    }

    /// One column constant.
    fn format_column_names_part(&self, template: &Template, arguments: &Arguments) -> Result<String, FormatError> {
        template.format(arguments)
    }

    fn format_primary_key_part(&self, template: &Template, arguments: &Arguments) -> Result<String, FormatError> {
        template.format(arguments)
    }

    /// One foreign key constant.
    fn format_foreign_keys_part(&self, template: &Template, arguments: &Arguments) -> Result<String, FormatError> {
        template.format(arguments)
    }

    /// The setter and getter of one column on the row type.
    fn format_row_property_accessor_part(
        &self,
        template: &Template,
        arguments: &Arguments,
    ) -> Result<String, FormatError> {
        template.format(arguments)
    }

    /// Navigation from a row to the row it references through one foreign key.
    fn format_row_relationship_part(&self, template: &Template, arguments: &Arguments) -> Result<String, FormatError> {
        template.format(arguments)
    }

    /// One column field of the query assist type.
    fn format_column_part1(&self, template: &Template, arguments: &Arguments) -> Result<String, FormatError> {
        template.format(arguments)
    }

    /// One column field initializer of the query assist type.
    fn format_column_part2(&self, template: &Template, arguments: &Arguments) -> Result<String, FormatError> {
        template.format(arguments)
    }

    /// Navigation from a query assist to the assist of a referenced table.
    fn format_table_relationship_part(
        &self,
        template: &Template,
        arguments: &Arguments,
    ) -> Result<String, FormatError> {
        template.format(arguments)
    }
}

/// Renders every template by plain substitution.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultCodeFormatter;

impl CodeFormatter for DefaultCodeFormatter {}

impl<F: CodeFormatter + ?Sized> CodeFormatter for &F {
    fn format(&self, template: &Template, arguments: &Arguments) -> Result<String, FormatError> {
        (**self).format(template, arguments)
    }

    fn format_column_names_part(&self, template: &Template, arguments: &Arguments) -> Result<String, FormatError> {
        (**self).format_column_names_part(template, arguments)
    }

    fn format_primary_key_part(&self, template: &Template, arguments: &Arguments) -> Result<String, FormatError> {
        (**self).format_primary_key_part(template, arguments)
    }

    fn format_foreign_keys_part(&self, template: &Template, arguments: &Arguments) -> Result<String, FormatError> {
        (**self).format_foreign_keys_part(template, arguments)
    }

    fn format_row_property_accessor_part(
        &self,
        template: &Template,
        arguments: &Arguments,
    ) -> Result<String, FormatError> {
        (**self).format_row_property_accessor_part(template, arguments)
    }

    fn format_row_relationship_part(&self, template: &Template, arguments: &Arguments) -> Result<String, FormatError> {
        (**self).format_row_relationship_part(template, arguments)
    }

    fn format_column_part1(&self, template: &Template, arguments: &Arguments) -> Result<String, FormatError> {
        (**self).format_column_part1(template, arguments)
    }

    fn format_column_part2(&self, template: &Template, arguments: &Arguments) -> Result<String, FormatError> {
        (**self).format_column_part2(template, arguments)
    }

    fn format_table_relationship_part(
        &self,
        template: &Template,
        arguments: &Arguments,
    ) -> Result<String, FormatError> {
        (**self).format_table_relationship_part(template, arguments)
    }
}

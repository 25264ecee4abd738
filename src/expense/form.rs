//! The input fields shared by the add and edit expense forms.

use maud::{Markup, html};
use time::{Date, OffsetDateTime};

use crate::{
    expense::{ExpenseForm, MAX_DESCRIPTION_LENGTH},
    expense_type::ExpenseType,
    html::{FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, field_error},
    validation::ValidationErrors,
};

/// Today's date in the server's local time zone, or UTC if the local offset
/// cannot be determined.
pub(super) fn today() -> Date {
    OffsetDateTime::now_local()
        .unwrap_or_else(|_| OffsetDateTime::now_utc())
        .date()
}

/// Render the expense input fields filled in with the values from `form`
/// and the error message for each invalid field.
pub(super) fn expense_form_fields(
    form: &ExpenseForm,
    expense_types: &[ExpenseType],
    errors: &ValidationErrors,
) -> Markup {
    html! {
        @if let Some(id) = form.id {
            input type="hidden" name="id" value=(id);
        }

        div
        {
            label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }

            input
                id="amount"
                type="number"
                name="amount"
                value=(form.amount)
                min="0"
                step="0.01"
                placeholder="0.00"
                required
                class=(FORM_TEXT_INPUT_STYLE);

            (field_error(errors.get("amount")))
        }

        div
        {
            label for="date" class=(FORM_LABEL_STYLE) { "Date" }

            input
                id="date"
                type="date"
                name="date"
                value=(form.date)
                required
                class=(FORM_TEXT_INPUT_STYLE);

            (field_error(errors.get("date")))
        }

        div
        {
            label for="expense_type_id" class=(FORM_LABEL_STYLE) { "Expense Type" }

            select
                id="expense_type_id"
                name="expense_type_id"
                required
                class=(FORM_TEXT_INPUT_STYLE)
            {
                option value="" selected[form.expense_type_id.is_empty()] { "Choose an expense type" }

                @for expense_type in expense_types {
                    option
                        value=(expense_type.id)
                        selected[form.expense_type_id.trim() == expense_type.id.to_string()]
                    {
                        (expense_type.name)
                    }
                }
            }

            (field_error(errors.get("expense_type_id")))
        }

        div
        {
            label for="description" class=(FORM_LABEL_STYLE) { "Description" }

            input
                id="description"
                type="text"
                name="description"
                value=(form.description)
                maxlength=(MAX_DESCRIPTION_LENGTH)
                placeholder="What was it for?"
                required
                class=(FORM_TEXT_INPUT_STYLE);

            (field_error(errors.get("description")))
        }
    }
}
